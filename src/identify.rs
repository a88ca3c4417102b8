//! Console frame buffer identification.
//!
//! Walks the query fallback chain against a device and turns the outcome
//! into a display name, an optional type code and a status.

use anyhow::{Error, anyhow};
use std::borrow::Cow;
use std::path::Path;

use crate::decode::decode_fb_type;
use crate::fbio::{FbDevice, Framebuffer};

/// Well-known console frame buffer device.
pub const DEFAULT_DEVICE: &str = "/dev/fb";

/// Name reported when the device node cannot be opened.
pub const OPEN_FAILED: &str = "unable to open fb";

/// Name reported when every frame buffer ioctl is rejected.
pub const IOCTL_FAILED: &str = "ioctl on fb failed";

/// Name reported for a type code missing from the compiled-in table.
pub const UNKNOWN: &str = "unknown";

/// How far identification got.
#[derive(Debug)]
pub enum Status {
    /// The frame buffer was named.
    Identified,
    /// The driver answered with a type code this build has no name for.
    Unrecognized,
    /// The device could not be opened or queried.
    Failed(Error),
}

impl Status {
    /// Process exit code for this status: 0, 1 or 2.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Status::Identified => 0,
            Status::Unrecognized => 1,
            Status::Failed(_) => 2,
        }
    }
}

/// Result of identifying a frame buffer device.
#[derive(Debug)]
pub struct Identification {
    /// Display name: a mnemonic, a driver-supplied name or a failure label
    pub name: Cow<'static, str>,
    /// Type code, when the driver reported one
    pub code: Option<i32>,
    /// Outcome of the query
    pub status: Status,
}

impl Identification {
    fn failed(name: &'static str, error: Error) -> Self {
        Self {
            name: Cow::Borrowed(name),
            code: None,
            status: Status::Failed(error),
        }
    }

    fn from_type_code(code: i32) -> Self {
        match decode_fb_type(code) {
            Some(name) => Self {
                name: Cow::Borrowed(name),
                code: Some(code),
                status: Status::Identified,
            },
            None => {
                debug!("type code {code} is not in the compiled-in table");
                Self {
                    name: Cow::Borrowed(UNKNOWN),
                    code: Some(code),
                    status: Status::Unrecognized,
                }
            }
        }
    }
}

/// Identify the frame buffer behind the device node at `path`.
///
/// The device is opened once and closed before returning, whatever the
/// outcome.
#[must_use]
pub fn identify(path: &Path) -> Identification {
    debug!("device={}", path.display());

    match FbDevice::open(path) {
        Ok(device) => identify_device(&device, path),
        Err(err) => {
            debug!("open failed: {err:#}");
            Identification::failed(OPEN_FAILED, err)
        }
    }
}

/// Run the query fallback chain against an already open `device`.
///
/// 1. `VIS_GETIDENTIFIER`, when the platform has it; its name is used as is
/// 2. `FBIOGATTR`
/// 3. `FBIOGTYPE`, for early frame buffers that reject `FBIOGATTR`
///
/// `path` only appears in diagnostics.
#[must_use]
pub fn identify_device<D: Framebuffer>(device: &D, path: &Path) -> Identification {
    match device.identifier() {
        Some(Ok(id)) => {
            debug!("VIS_GETIDENTIFIER name={:?} code={}", id.name, id.code);
            return Identification {
                name: Cow::Owned(id.name),
                code: Some(id.code),
                status: Status::Identified,
            };
        }
        Some(Err(errno)) => debug!("VIS_GETIDENTIFIER failed: {errno}"),
        None => {}
    }

    let fbtype = device
        .attributes()
        .map(|attr| attr.fbtype)
        .or_else(|errno| {
            debug!("FBIOGATTR failed: {errno}");
            device.fb_type()
        });

    match fbtype {
        Ok(fbtype) => {
            debug!("fb_type={}", fbtype.fb_type);
            Identification::from_type_code(fbtype.fb_type)
        }
        Err(errno) => {
            debug!("FBIOGTYPE failed: {errno}");
            Identification::failed(
                IOCTL_FAILED,
                anyhow!("FBIO ioctls failed on {}: {errno}", path.display()),
            )
        }
    }
}
