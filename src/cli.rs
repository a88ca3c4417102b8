//! Command-line handling: `constype [device-path] [-num]`.

use std::ffi::OsString;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use crate::identify::{DEFAULT_DEVICE, Identification};

/// Type code printed by `-num` when none was obtained.
const NO_TYPE_CODE: i32 = -1;

/// Parsed command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// Frame buffer device node to query
    pub device: PathBuf,
    /// Append the numeric type code to the name
    pub show_num: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            device: PathBuf::from(DEFAULT_DEVICE),
            show_num: false,
        }
    }
}

impl Args {
    /// Parse arguments, program name excluded.
    ///
    /// The first argument overrides the device when it starts with `/`. The
    /// argument after it turns on numeric output when it is a prefix of
    /// `-num`. Anything else is ignored.
    #[must_use]
    pub fn parse<I>(args: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter().peekable();

        if let Some(device) = args.next_if(|arg| arg.as_bytes().starts_with(b"/")) {
            parsed.device = PathBuf::from(device);
        }
        if let Some(flag) = args.next_if(|arg| is_num_flag(arg.as_bytes())) {
            debug!("flag={}", flag.to_string_lossy());
            parsed.show_num = true;
        }
        for ignored in args {
            debug!("ignoring argument {}", ignored.to_string_lossy());
        }

        parsed
    }
}

/// Whether `arg` is a non-empty prefix of `-num`.
fn is_num_flag(arg: &[u8]) -> bool {
    !arg.is_empty() && b"-num".starts_with(arg)
}

/// Format the stdout line for `id`, without the trailing newline.
#[must_use]
pub fn render(id: &Identification, show_num: bool) -> String {
    if show_num {
        format!("{} {}", id.name, id.code.unwrap_or(NO_TYPE_CODE))
    } else {
        id.name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identify::Status;
    use anyhow::anyhow;
    use std::borrow::Cow;

    fn parse(args: &[&str]) -> Args {
        Args::parse(args.iter().map(OsString::from))
    }

    fn identification(name: &'static str, code: Option<i32>, status: Status) -> Identification {
        Identification {
            name: Cow::Borrowed(name),
            code,
            status,
        }
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(parse(&[]), Args::default());
        assert_eq!(parse(&[]).device, PathBuf::from("/dev/fb"));
        assert_eq!(parse(&["/dev/fb"]), parse(&[]));
    }

    #[test]
    fn test_parse_device() {
        let args = parse(&["/dev/cgthree0"]);
        assert_eq!(args.device, PathBuf::from("/dev/cgthree0"));
        assert!(!args.show_num);

        // A relative path is not taken as a device
        let args = parse(&["dev/fb"]);
        assert_eq!(args.device, PathBuf::from(DEFAULT_DEVICE));
    }

    #[test]
    fn test_parse_num_flag() {
        for flag in ["-", "-n", "-nu", "-num"] {
            assert!(parse(&[flag]).show_num, "{flag}");
            let args = parse(&["/dev/fb0", flag]);
            assert!(args.show_num, "{flag}");
            assert_eq!(args.device, PathBuf::from("/dev/fb0"));
        }

        for not_flag in ["", "-numb", "-x", "num", "--num"] {
            assert!(!parse(&[not_flag]).show_num, "{not_flag:?}");
        }
    }

    #[test]
    fn test_parse_ignores_extra_arguments() {
        let args = parse(&["/dev/fb0", "-num", "/dev/fb1", "-x"]);
        assert_eq!(args.device, PathBuf::from("/dev/fb0"));
        assert!(args.show_num);

        // The flag only counts right after the optional device
        let args = parse(&["-x", "-num"]);
        assert!(!args.show_num);
    }

    #[test]
    fn test_parse_non_utf8_device() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(b"/dev/\xfffb".to_vec());
        let args = Args::parse([raw.clone()]);
        assert_eq!(args.device, PathBuf::from(raw));
    }

    #[test]
    fn test_render() {
        let id = identification("cg3", Some(6), Status::Identified);
        assert_eq!(render(&id, false), "cg3");
        assert_eq!(render(&id, true), "cg3 6");

        let id = identification("unknown", Some(42), Status::Unrecognized);
        assert_eq!(render(&id, false), "unknown");
        assert_eq!(render(&id, true), "unknown 42");

        let id = identification("unable to open fb", None, Status::Failed(anyhow!("boom")));
        assert_eq!(render(&id, false), "unable to open fb");
        assert_eq!(render(&id, true), "unable to open fb -1");
    }
}
