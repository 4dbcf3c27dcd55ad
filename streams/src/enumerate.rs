// Stream enumeration
// Wraps the Win32 find-stream API as a lazy iterator. The native find
// handle is released in Drop, so a caller may break out early without
// leaking it. Each call to `list` opens a fresh enumeration.

use std::path::Path;

use adsview_core::{AdsError, StreamDescriptor};

use crate::name;

#[cfg(target_os = "windows")]
use log::{debug, warn};
#[cfg(target_os = "windows")]
use winapi::um::errhandlingapi::GetLastError;
#[cfg(target_os = "windows")]
use winapi::um::fileapi::{FindClose, FindFirstStreamW, FindNextStreamW, WIN32_FIND_STREAM_DATA};
#[cfg(target_os = "windows")]
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
#[cfg(target_os = "windows")]
use winapi::um::minwinbase::FindStreamInfoStandard;
#[cfg(target_os = "windows")]
use winapi::um::winnt::HANDLE;

#[cfg(target_os = "windows")]
use crate::name::ParseError;
#[cfg(target_os = "windows")]
use crate::winutil::{self, from_wide_buf, to_wide};

/// Lazy sequence of stream descriptors on one entry.
///
/// Yields descriptors in whatever order the platform reports them; no
/// ordering guarantee is made. Unnamed-stream records are skipped silently,
/// malformed records are skipped with a warning (best-effort listing).
#[cfg(target_os = "windows")]
pub struct StreamList {
    handle: HANDLE,
    pending: Option<WIN32_FIND_STREAM_DATA>,
    entry: String,
    done: bool,
}

/// Enumerate the alternate data streams present on `entry_path`.
///
/// An entry with no named streams yields an empty sequence, not an error.
#[cfg(target_os = "windows")]
pub fn list(entry_path: &Path) -> Result<StreamList, AdsError> {
    let entry = entry_path.display().to_string();
    let wide = to_wide(entry_path.as_os_str());
    let mut data: WIN32_FIND_STREAM_DATA = unsafe { std::mem::zeroed() };

    let handle = unsafe {
        FindFirstStreamW(
            wide.as_ptr(),
            FindStreamInfoStandard,
            &mut data as *mut _ as *mut _,
            0,
        )
    };

    if handle == INVALID_HANDLE_VALUE {
        let code = unsafe { GetLastError() };
        return match code {
            // A directory with no streams at all reports EOF up front
            winutil::ERROR_HANDLE_EOF => Ok(StreamList {
                handle: INVALID_HANDLE_VALUE,
                pending: None,
                entry,
                done: true,
            }),
            winutil::ERROR_FILE_NOT_FOUND | winutil::ERROR_PATH_NOT_FOUND => {
                Err(AdsError::EntryNotFound(entry))
            }
            winutil::ERROR_ACCESS_DENIED | winutil::ERROR_SHARING_VIOLATION => {
                Err(AdsError::EntryInaccessible(entry))
            }
            _ => Err(AdsError::from_os_error(code)),
        };
    }

    debug!("Enumerating streams on {}", entry);
    Ok(StreamList {
        handle,
        pending: Some(data),
        entry,
        done: false,
    })
}

#[cfg(target_os = "windows")]
impl Iterator for StreamList {
    type Item = StreamDescriptor;

    fn next(&mut self) -> Option<StreamDescriptor> {
        loop {
            let record = match self.pending.take() {
                Some(record) => record,
                None => {
                    if self.done {
                        return None;
                    }
                    let mut data: WIN32_FIND_STREAM_DATA = unsafe { std::mem::zeroed() };
                    let ok =
                        unsafe { FindNextStreamW(self.handle, &mut data as *mut _ as *mut _) };
                    if ok == 0 {
                        let code = unsafe { GetLastError() };
                        if code != winutil::ERROR_HANDLE_EOF {
                            warn!(
                                "Stream enumeration on {} ended early: OS error {}",
                                self.entry, code
                            );
                        }
                        self.done = true;
                        return None;
                    }
                    data
                }
            };

            let raw = from_wide_buf(&record.cStreamName);
            match name::parse(&raw) {
                Ok(stream_name) => {
                    // StreamSize is a signed 64-bit quantity on the wire
                    let size = unsafe { *record.StreamSize.QuadPart() }.max(0) as u64;
                    return Some(StreamDescriptor {
                        name: stream_name,
                        size,
                    });
                }
                // The entry's primary content, not an alternate stream
                Err(ParseError::NotAStream) => continue,
                Err(ParseError::Malformed(msg)) => {
                    warn!("Skipping malformed stream record on {}: {}", self.entry, msg);
                    continue;
                }
            }
        }
    }
}

#[cfg(target_os = "windows")]
impl Drop for StreamList {
    fn drop(&mut self) {
        if self.handle != INVALID_HANDLE_VALUE {
            unsafe {
                FindClose(self.handle);
            }
        }
    }
}

// Non-Windows stub implementation
#[cfg(not(target_os = "windows"))]
pub struct StreamList;

#[cfg(not(target_os = "windows"))]
impl Iterator for StreamList {
    type Item = StreamDescriptor;

    fn next(&mut self) -> Option<StreamDescriptor> {
        None
    }
}

#[cfg(not(target_os = "windows"))]
pub fn list(_entry_path: &Path) -> Result<StreamList, AdsError> {
    Err(AdsError::PlatformNotSupported(
        "stream enumeration requires an NTFS volume on Windows".to_string(),
    ))
}

/// Check whether `stream_name` exists on `entry_path`.
///
/// Names are compared case-insensitively (ASCII fold), matching the
/// volume's comparison rule for the common case. The answer is a snapshot;
/// another process may create or delete the stream immediately after.
pub fn exists(entry_path: &Path, stream_name: &str) -> Result<bool, AdsError> {
    name::validate_name(stream_name)?;
    let mut streams = list(entry_path)?;
    Ok(streams.any(|d| d.name.eq_ignore_ascii_case(stream_name)))
}
