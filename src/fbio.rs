//! Frame buffer device-control bindings.
//!
//! This module provides:
//! - The `<sys/fbio.h>` and `<sys/visual_io.h>` records exchanged with the driver
//! - The [`Framebuffer`] trait, one method per query form
//! - [`FbDevice`], the implementation backed by an open device node

#![allow(unsafe_code)]

use anyhow::{Context, Result};
use nix::libc::c_int;
use std::ffi::CStr;
use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::Path;

/// Sun-like targets open the device read-only, everything else read/write.
const SUN_LIKE: bool = cfg!(any(target_os = "solaris", target_os = "illumos"));

/// Whether `VIS_GETIDENTIFIER` is available (Solaris 2.3 and later).
///
/// Its request number collides with unrelated ioctls elsewhere, so it is
/// never issued off Sun-like targets.
pub const HAS_VIS_IDENTIFIER: bool = SUN_LIKE;

/// Size of the name buffer in `struct vis_identifier`.
pub const VIS_MAXNAMELEN: usize = 128;

/// Number of device-specific words in `struct fbsattr`.
const FB_ATTR_NDEVSPECIFIC: usize = 8;

/// Number of emulation types in `struct fbgattr`.
const FB_ATTR_NEMUTYPES: usize = 4;

/// `struct fbtype`, as returned by `FBIOGTYPE`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FbType {
    /// Frame buffer type code
    pub fb_type: c_int,
    /// Height in pixels
    pub fb_height: c_int,
    /// Width in pixels
    pub fb_width: c_int,
    /// Bits per pixel
    pub fb_depth: c_int,
    /// Colormap entries
    pub fb_cmsize: c_int,
    /// Total size in bytes
    pub fb_size: c_int,
}

/// `struct fbsattr`, the settable attributes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FbSAttr {
    /// Attribute flags
    pub flags: c_int,
    /// Emulated type code
    pub emu_type: c_int,
    /// Driver-defined words
    pub dev_specific: [c_int; FB_ATTR_NDEVSPECIFIC],
}

/// `struct fbgattr`, as returned by `FBIOGATTR`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FbGAttr {
    /// Real type code of the hardware
    pub real_type: c_int,
    /// Owner process, 0 when none
    pub owner: c_int,
    /// Current type, possibly emulated
    pub fbtype: FbType,
    /// Settable attributes
    pub sattr: FbSAttr,
    /// Type codes this device can emulate
    pub emu_types: [c_int; FB_ATTR_NEMUTYPES],
}

/// `struct vis_identifier`, as filled by `VIS_GETIDENTIFIER`.
#[repr(C)]
pub(crate) struct VisIdentifier {
    name: [u8; VIS_MAXNAMELEN],
}

impl VisIdentifier {
    fn new() -> Self {
        Self {
            name: [0; VIS_MAXNAMELEN],
        }
    }

    /// Name up to the first NUL, or the whole buffer if unterminated.
    fn name(&self) -> String {
        CStr::from_bytes_until_nul(&self.name).map_or_else(
            |_| String::from_utf8_lossy(&self.name).into_owned(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

/// Driver-supplied identification from `VIS_GETIDENTIFIER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// Ready-made display name, e.g. `SUNWffb`
    pub name: String,
    /// Type code returned by the ioctl
    pub code: i32,
}

mod ffi {
    use super::{FbGAttr, FbType, VisIdentifier};
    use nix::sys::ioctl::ioctl_num_type;

    /// `FIOC` from `<sys/fbio.h>`.
    #[allow(clippy::cast_lossless)]
    const FIOC: ioctl_num_type = (b'F' as ioctl_num_type) << 8;

    /// `VIOC` from `<sys/visual_io.h>`.
    #[allow(clippy::cast_lossless)]
    const VIOC: ioctl_num_type = (b'V' as ioctl_num_type) << 8;

    // Solaris/illumos number these without a size or direction.
    #[cfg(any(target_os = "solaris", target_os = "illumos"))]
    pub(super) const FBIOGTYPE: ioctl_num_type = FIOC;
    #[cfg(any(target_os = "solaris", target_os = "illumos"))]
    pub(super) const FBIOGATTR: ioctl_num_type = FIOC | 6;

    // Everywhere else, including Linux/sparc and the BSDs, they are `_IOR`.
    #[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
    pub(super) const FBIOGTYPE: ioctl_num_type =
        nix::request_code_read!(b'F', 0, std::mem::size_of::<FbType>());
    #[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
    pub(super) const FBIOGATTR: ioctl_num_type =
        nix::request_code_read!(b'F', 6, std::mem::size_of::<FbGAttr>());

    /// `VIOC | 0`. Only meaningful on Sun-like targets: on Linux the same
    /// number is `VT_OPENQRY`.
    pub(super) const VIS_GETIDENTIFIER: ioctl_num_type = VIOC;

    nix::ioctl_read_bad!(fbio_gtype, FBIOGTYPE, FbType);
    nix::ioctl_read_bad!(fbio_gattr, FBIOGATTR, FbGAttr);
    nix::ioctl_read_bad!(vis_get_identifier, VIS_GETIDENTIFIER, VisIdentifier);
}

/// The device-control queries the identifier falls back through.
pub trait Framebuffer {
    /// Issue `VIS_GETIDENTIFIER`.
    ///
    /// Returns `None` when the platform has no such call.
    fn identifier(&self) -> Option<nix::Result<Identifier>>;

    /// Issue `FBIOGATTR`. Fails on early frame buffer types.
    ///
    /// # Errors
    ///
    /// Returns the errno reported by the driver.
    fn attributes(&self) -> nix::Result<FbGAttr>;

    /// Issue `FBIOGTYPE`.
    ///
    /// # Errors
    ///
    /// Returns the errno reported by the driver.
    fn fb_type(&self) -> nix::Result<FbType>;
}

/// An open frame buffer device node. The descriptor is closed on drop.
#[derive(Debug)]
pub struct FbDevice {
    file: File,
}

impl FbDevice {
    /// Opens the device node at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error naming `path` if the device cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(!SUN_LIKE)
            .open(path)
            .with_context(|| format!("unable to open {}", path.display()))?;
        Ok(Self { file })
    }
}

impl Framebuffer for FbDevice {
    fn identifier(&self) -> Option<nix::Result<Identifier>> {
        if !HAS_VIS_IDENTIFIER {
            return None;
        }
        let mut id = VisIdentifier::new();
        // SAFETY: `id` is a live, correctly sized vis_identifier for the call.
        let result = unsafe { ffi::vis_get_identifier(self.file.as_raw_fd(), &raw mut id) };
        Some(result.map(|code| Identifier {
            name: id.name(),
            code,
        }))
    }

    fn attributes(&self) -> nix::Result<FbGAttr> {
        let mut attr = FbGAttr::default();
        // SAFETY: `attr` is a live, correctly sized fbgattr for the call.
        unsafe { ffi::fbio_gattr(self.file.as_raw_fd(), &raw mut attr) }?;
        Ok(attr)
    }

    fn fb_type(&self) -> nix::Result<FbType> {
        let mut fbtype = FbType::default();
        // SAFETY: `fbtype` is a live, correctly sized fbtype for the call.
        unsafe { ffi::fbio_gtype(self.file.as_raw_fd(), &raw mut fbtype) }?;
        Ok(fbtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::fcntl::{FcntlArg, OFlag, fcntl};
    use std::mem::size_of;

    #[test]
    fn test_record_layouts() {
        assert_eq!(size_of::<FbType>(), 6 * size_of::<c_int>());
        assert_eq!(size_of::<FbSAttr>(), 10 * size_of::<c_int>());
        assert_eq!(size_of::<FbGAttr>(), 22 * size_of::<c_int>());
        assert_eq!(size_of::<VisIdentifier>(), VIS_MAXNAMELEN);
    }

    #[test]
    fn test_vis_identifier_name() {
        let mut id = VisIdentifier::new();
        assert_eq!(id.name(), "");

        id.name[..7].copy_from_slice(b"SUNWffb");
        assert_eq!(id.name(), "SUNWffb");

        id.name = [b'x'; VIS_MAXNAMELEN];
        assert_eq!(id.name().len(), VIS_MAXNAMELEN);
    }

    #[test]
    fn test_open_missing_device() {
        let err = FbDevice::open(Path::new("/nonexistent/constype/fb")).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("unable to open /nonexistent/constype/fb: "));
    }

    #[test]
    fn test_ioctls_rejected_by_non_framebuffer() -> Result<()> {
        let device = FbDevice::open(Path::new("/dev/null"))?;
        assert!(device.attributes().is_err());
        assert!(device.fb_type().is_err());
        Ok(())
    }

    #[test]
    fn test_request_numbers_keep_fioc_low_bits() {
        assert_eq!(ffi::FBIOGTYPE & 0xffff, 0x4600);
        assert_eq!(ffi::FBIOGATTR & 0xffff, 0x4606);
        assert_eq!(ffi::VIS_GETIDENTIFIER, 0x5600);
    }

    #[test]
    #[cfg(any(target_os = "solaris", target_os = "illumos"))]
    fn test_request_numbers_unsized_on_sun() {
        assert_eq!(ffi::FBIOGTYPE, 0x4600);
        assert_eq!(ffi::FBIOGATTR, 0x4606);
    }

    #[test]
    #[cfg(all(
        target_os = "linux",
        any(
            target_arch = "x86_64",
            target_arch = "x86",
            target_arch = "aarch64",
            target_arch = "arm",
            target_arch = "riscv64"
        )
    ))]
    fn test_request_numbers_ior_on_linux() {
        assert_eq!(ffi::FBIOGTYPE, 0x8018_4600);
        assert_eq!(ffi::FBIOGATTR, 0x8058_4606);
    }

    #[test]
    fn test_vis_identifier_only_on_sun() {
        assert_eq!(HAS_VIS_IDENTIFIER, SUN_LIKE);
        assert_eq!(
            SUN_LIKE,
            cfg!(any(target_os = "solaris", target_os = "illumos"))
        );
    }

    #[test]
    #[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
    fn test_identifier_not_issued_off_sun() -> Result<()> {
        let device = FbDevice::open(Path::new("/dev/null"))?;
        assert!(device.identifier().is_none());
        Ok(())
    }

    #[test]
    fn test_open_mode() -> Result<()> {
        let device = FbDevice::open(Path::new("/dev/null"))?;
        let flags = fcntl(&device.file, FcntlArg::F_GETFL)?;
        let mode = OFlag::from_bits_truncate(flags) & OFlag::O_ACCMODE;
        let expected = if SUN_LIKE { OFlag::O_RDONLY } else { OFlag::O_RDWR };
        assert_eq!(mode, expected);
        Ok(())
    }
}
