//! Logging and debug utilities.
//!
//! Debug output goes to stderr and is only emitted when the `DEBUG`
//! environment variable is set, so stdout stays clean for shell scripts
//! that capture the console type.

use std::env;

/// Format a message and hand it to [`debug`](crate::logs::debug).
///
/// Takes the same arguments as `format!`. The message is formatted even when
/// `DEBUG` is unset, so keep the arguments cheap.
///
/// # Examples
///
/// ```ignore
/// debug!("FBIOGATTR failed: {errno}");
/// ```
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::logs::debug(&format!($($arg)*))
    };
}

/// Print debug messages to stderr if DEBUG environment variable is set.
///
/// This function checks for the presence of the `DEBUG` environment variable
/// and only outputs the message if it's set. Messages are prefixed with the
/// program name so they can be told apart from the one-line failure
/// diagnostic that is always written to stderr.
///
/// # Arguments
///
/// * `message` - The debug message to print
///
/// # Examples
///
/// ```ignore
/// debug("trying FBIOGTYPE");
/// debug(&format!("fb_type={}", 6));
/// ```
pub(crate) fn debug(message: &str) {
    if enabled() {
        eprintln!("constype: {message}");
    }
}

/// Whether the `DEBUG` environment variable is present.
fn enabled() -> bool {
    env::var_os("DEBUG").is_some()
}
