// Small helpers shared by the Win32-backed modules: wide-string conversion
// and the handful of raw error codes this layer maps to typed failures.

use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;

pub(crate) const ERROR_FILE_NOT_FOUND: u32 = 2;
pub(crate) const ERROR_PATH_NOT_FOUND: u32 = 3;
pub(crate) const ERROR_ACCESS_DENIED: u32 = 5;
pub(crate) const ERROR_SHARING_VIOLATION: u32 = 32;
pub(crate) const ERROR_HANDLE_EOF: u32 = 38;

/// NUL-terminated UTF-16 copy of `s` for the *W API surface.
pub(crate) fn to_wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

/// Decode a fixed-size UTF-16 buffer up to its NUL terminator.
pub(crate) fn from_wide_buf(buf: &[u16]) -> String {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_round_trip() {
        let wide = to_wide(OsStr::new("report.txt:notes:$DATA"));
        assert_eq!(*wide.last().unwrap(), 0);
        assert_eq!(from_wide_buf(&wide), "report.txt:notes:$DATA");
    }

    #[test]
    fn test_from_wide_buf_stops_at_nul() {
        let mut buf = vec![0u16; 8];
        for (i, c) in "abc".encode_utf16().enumerate() {
            buf[i] = c;
        }
        assert_eq!(from_wide_buf(&buf), "abc");
    }
}
