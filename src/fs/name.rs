//! File names as the raw bytes written into the body.

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};

/// Bytes of a file name as the body stores them.
#[cfg(unix)]
pub fn to_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(name.as_bytes())
}

/// Bytes of a file name as the body stores them. Names that are not
/// Unicode are replaced lossily on this platform.
#[cfg(not(unix))]
pub fn to_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    match name.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

/// The file name a run of body bytes stands for.
#[cfg(unix)]
pub fn from_bytes(bytes: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    OsStr::from_bytes(bytes).to_os_string()
}

#[cfg(not(unix))]
pub fn from_bytes(bytes: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Whether a name is hidden by default.
pub fn is_hidden(name: &[u8]) -> bool {
    name.starts_with(b".")
}
