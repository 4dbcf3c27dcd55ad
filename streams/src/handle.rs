// Stream handles
// Opens one named stream through the ordinary CreateFileW path syntax
// (`entry:name:$DATA`) and exposes byte-level read/write. The native
// handle is released on every exit path; a failed operation never leaks it.

use std::path::Path;

use adsview_core::AdsError;

#[cfg(target_os = "windows")]
use log::debug;
#[cfg(target_os = "windows")]
use std::ptr::null_mut;
#[cfg(target_os = "windows")]
use winapi::shared::minwindef::DWORD;
#[cfg(target_os = "windows")]
use winapi::um::errhandlingapi::GetLastError;
#[cfg(target_os = "windows")]
use winapi::um::fileapi::{
    CreateFileW, ReadFile, SetEndOfFile, SetFilePointerEx, WriteFile, CREATE_ALWAYS, OPEN_ALWAYS,
    OPEN_EXISTING,
};
#[cfg(target_os = "windows")]
use winapi::um::handleapi::{CloseHandle, INVALID_HANDLE_VALUE};
#[cfg(target_os = "windows")]
use winapi::um::winbase::FILE_BEGIN;
#[cfg(target_os = "windows")]
use winapi::um::winnt::{
    FILE_APPEND_DATA, FILE_SHARE_READ, GENERIC_READ, GENERIC_WRITE, HANDLE, LARGE_INTEGER,
};

#[cfg(target_os = "windows")]
use crate::winutil::{self, to_wide};

/// How a stream should be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Open an existing stream for reading; fails if it does not exist.
    ReadExisting,
    /// Create the stream, or truncate it to zero length if present.
    CreateOrTruncate,
    /// Create the stream if absent, position writes at the end otherwise.
    AppendOrCreate,
}

/// Capability object bound to one open stream.
///
/// Single-owner: not meant to be shared across concurrent operations.
/// `close` is idempotent; Drop closes the handle if the caller did not.
#[cfg(target_os = "windows")]
pub struct StreamHandle {
    handle: HANDLE,
    path: String,
}

#[cfg(target_os = "windows")]
impl StreamHandle {
    /// Open `stream_name` on `entry_path` in the requested mode.
    ///
    /// The owning entry must already exist for every mode; a create mode
    /// makes the stream, never the entry itself.
    pub fn open(
        entry_path: &Path,
        stream_name: &str,
        mode: OpenMode,
    ) -> Result<StreamHandle, AdsError> {
        let stream_path = crate::name::build_path(entry_path, stream_name)?;
        let display_path = stream_path.to_string_lossy().into_owned();

        // CREATE_ALWAYS on a stream path would fabricate a missing entry
        if !entry_path.exists() {
            return Err(AdsError::EntryNotFound(entry_path.display().to_string()));
        }

        let (access, share, disposition) = match mode {
            OpenMode::ReadExisting => (GENERIC_READ, FILE_SHARE_READ, OPEN_EXISTING),
            OpenMode::CreateOrTruncate => (GENERIC_WRITE, 0, CREATE_ALWAYS),
            OpenMode::AppendOrCreate => (FILE_APPEND_DATA, 0, OPEN_ALWAYS),
        };

        let wide = to_wide(&stream_path);
        let handle = unsafe {
            CreateFileW(
                wide.as_ptr(),
                access,
                share,
                null_mut(),
                disposition,
                0,
                null_mut(),
            )
        };

        if handle == INVALID_HANDLE_VALUE {
            let code = unsafe { GetLastError() };
            return Err(match code {
                winutil::ERROR_FILE_NOT_FOUND => {
                    // The entry passed the pre-check, so a not-found here
                    // names the stream (unless the entry vanished meanwhile)
                    if entry_path.exists() {
                        AdsError::StreamNotFound(display_path)
                    } else {
                        AdsError::EntryNotFound(entry_path.display().to_string())
                    }
                }
                winutil::ERROR_PATH_NOT_FOUND => {
                    AdsError::EntryNotFound(entry_path.display().to_string())
                }
                winutil::ERROR_ACCESS_DENIED => {
                    AdsError::EntryInaccessible(entry_path.display().to_string())
                }
                // Sharing violations are the platform's arbitration; surface
                // them rather than retrying or locking
                _ => AdsError::from_os_error(code),
            });
        }

        debug!("Opened stream {} ({:?})", display_path, mode);
        Ok(StreamHandle {
            handle,
            path: display_path,
        })
    }

    /// Read everything from the current position to the end of the stream.
    pub fn read_all(&mut self) -> Result<Vec<u8>, AdsError> {
        self.ensure_open()?;
        let mut out = Vec::new();
        let mut buf = vec![0u8; 64 * 1024];
        loop {
            let mut read: DWORD = 0;
            let ok = unsafe {
                ReadFile(
                    self.handle,
                    buf.as_mut_ptr() as *mut _,
                    buf.len() as DWORD,
                    &mut read,
                    null_mut(),
                )
            };
            if ok == 0 {
                let code = unsafe { GetLastError() };
                if code == winutil::ERROR_HANDLE_EOF {
                    break;
                }
                return Err(AdsError::from_os_error(code));
            }
            if read == 0 {
                break;
            }
            out.extend_from_slice(&buf[..read as usize]);
        }
        Ok(out)
    }

    /// Write the whole buffer to the stream at the current position.
    pub fn write(&mut self, data: &[u8]) -> Result<(), AdsError> {
        self.ensure_open()?;
        let mut offset = 0usize;
        while offset < data.len() {
            let chunk = &data[offset..];
            let len = chunk.len().min(DWORD::MAX as usize) as DWORD;
            let mut written: DWORD = 0;
            let ok = unsafe {
                WriteFile(
                    self.handle,
                    chunk.as_ptr() as *const _,
                    len,
                    &mut written,
                    null_mut(),
                )
            };
            if ok == 0 {
                return Err(AdsError::from_os_error(unsafe { GetLastError() }));
            }
            if written == 0 {
                return Err(AdsError::IoError(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    format!("no progress writing {}", self.path),
                )));
            }
            offset += written as usize;
        }
        Ok(())
    }

    /// Truncate (or extend with zeroes) the stream to `len` bytes.
    ///
    /// Needs a handle holding the write-data access right, i.e. one opened
    /// with `CreateOrTruncate`. Append-only handles (`AppendOrCreate`) do
    /// not carry that right; the platform rejects the end-of-file move with
    /// access denied, surfaced here as `IoError`.
    pub fn set_len(&mut self, len: u64) -> Result<(), AdsError> {
        self.ensure_open()?;
        unsafe {
            let mut distance: LARGE_INTEGER = std::mem::zeroed();
            *distance.QuadPart_mut() = len as i64;
            if SetFilePointerEx(self.handle, distance, null_mut(), FILE_BEGIN) == 0 {
                return Err(AdsError::from_os_error(GetLastError()));
            }
            if SetEndOfFile(self.handle) == 0 {
                return Err(AdsError::from_os_error(GetLastError()));
            }
        }
        Ok(())
    }

    /// Release the native handle. Safe to call more than once.
    pub fn close(&mut self) -> Result<(), AdsError> {
        if self.handle != INVALID_HANDLE_VALUE {
            let ok = unsafe { CloseHandle(self.handle) };
            self.handle = INVALID_HANDLE_VALUE;
            if ok == 0 {
                return Err(AdsError::from_os_error(unsafe { GetLastError() }));
            }
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), AdsError> {
        if self.handle == INVALID_HANDLE_VALUE {
            return Err(AdsError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("stream handle for {} already closed", self.path),
            )));
        }
        Ok(())
    }
}

#[cfg(target_os = "windows")]
impl Drop for StreamHandle {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

// Non-Windows stub implementation
#[cfg(not(target_os = "windows"))]
pub struct StreamHandle;

#[cfg(not(target_os = "windows"))]
impl StreamHandle {
    pub fn open(
        _entry_path: &Path,
        _stream_name: &str,
        _mode: OpenMode,
    ) -> Result<StreamHandle, AdsError> {
        Err(AdsError::PlatformNotSupported(
            "stream handles require an NTFS volume on Windows".to_string(),
        ))
    }

    pub fn read_all(&mut self) -> Result<Vec<u8>, AdsError> {
        Err(AdsError::PlatformNotSupported(
            "stream handles require an NTFS volume on Windows".to_string(),
        ))
    }

    pub fn write(&mut self, _data: &[u8]) -> Result<(), AdsError> {
        Err(AdsError::PlatformNotSupported(
            "stream handles require an NTFS volume on Windows".to_string(),
        ))
    }

    pub fn set_len(&mut self, _len: u64) -> Result<(), AdsError> {
        Err(AdsError::PlatformNotSupported(
            "stream handles require an NTFS volume on Windows".to_string(),
        ))
    }

    pub fn close(&mut self) -> Result<(), AdsError> {
        Ok(())
    }
}

#[cfg(all(test, not(target_os = "windows")))]
mod tests {
    use super::*;

    #[test]
    fn test_open_unsupported_off_windows() {
        assert!(matches!(
            StreamHandle::open(Path::new("report.txt"), "notes", OpenMode::ReadExisting),
            Err(AdsError::PlatformNotSupported(_))
        ));
    }
}
