// Stream deletion
// Removes exactly one named stream via DeleteFileW on the stream path;
// the primary content and every other stream are untouched. `delete_all`
// is best-effort: it keeps going past per-stream failures and reports them.

use std::path::Path;

use adsview_core::{AdsError, StreamDescriptor};
use log::warn;

use crate::enumerate::list;
use crate::name;

#[cfg(target_os = "windows")]
use log::debug;
#[cfg(target_os = "windows")]
use winapi::um::errhandlingapi::GetLastError;
#[cfg(target_os = "windows")]
use winapi::um::fileapi::DeleteFileW;

#[cfg(target_os = "windows")]
use crate::winutil::{self, to_wide};

/// One stream that `delete_all` could not remove.
#[derive(Debug)]
pub struct StreamFailure {
    pub name: String,
    pub error: AdsError,
}

/// Outcome of a best-effort batch deletion.
#[derive(Debug, Default)]
pub struct DeleteSummary {
    pub deleted: usize,
    pub failures: Vec<StreamFailure>,
}

/// Delete the named stream from `entry_path`.
#[cfg(target_os = "windows")]
pub fn delete(entry_path: &Path, stream_name: &str) -> Result<(), AdsError> {
    let stream_path = name::build_path(entry_path, stream_name)?;

    if !entry_path.exists() {
        return Err(AdsError::EntryNotFound(entry_path.display().to_string()));
    }

    let wide = to_wide(&stream_path);
    if unsafe { DeleteFileW(wide.as_ptr()) } == 0 {
        let code = unsafe { GetLastError() };
        return Err(match code {
            winutil::ERROR_FILE_NOT_FOUND => {
                if entry_path.exists() {
                    AdsError::StreamNotFound(stream_path.to_string_lossy().into_owned())
                } else {
                    AdsError::EntryNotFound(entry_path.display().to_string())
                }
            }
            winutil::ERROR_PATH_NOT_FOUND => {
                AdsError::EntryNotFound(entry_path.display().to_string())
            }
            // Access denied and sharing violations on the stream itself
            // (e.g. open elsewhere with exclusive access) are plain IO
            // failures at this level
            _ => AdsError::from_os_error(code),
        });
    }

    debug!("Deleted stream {}", stream_path.to_string_lossy());
    Ok(())
}

// Non-Windows stub implementation
#[cfg(not(target_os = "windows"))]
pub fn delete(_entry_path: &Path, stream_name: &str) -> Result<(), AdsError> {
    name::validate_name(stream_name)?;
    Err(AdsError::PlatformNotSupported(
        "stream deletion requires an NTFS volume on Windows".to_string(),
    ))
}

/// Delete every named stream on `entry_path`.
///
/// Per-stream failures do not abort the batch; each one is recorded in the
/// summary and deletion continues with the remaining streams. Enumeration
/// failure itself propagates.
pub fn delete_all(entry_path: &Path) -> Result<DeleteSummary, AdsError> {
    // Snapshot first so the find handle is closed before deletions begin
    let descriptors: Vec<StreamDescriptor> = list(entry_path)?.collect();

    let mut summary = DeleteSummary::default();
    for desc in descriptors {
        match delete(entry_path, &desc.name) {
            Ok(()) => summary.deleted += 1,
            Err(e) => {
                warn!(
                    "Failed to delete stream {} on {}: {}",
                    desc.name,
                    entry_path.display(),
                    e
                );
                summary.failures.push(StreamFailure {
                    name: desc.name,
                    error: e,
                });
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_rejects_invalid_name() {
        assert!(matches!(
            delete(Path::new("report.txt"), "bad:name"),
            Err(AdsError::InvalidName(_))
        ));
        assert!(matches!(
            delete(Path::new("report.txt"), ""),
            Err(AdsError::InvalidName(_))
        ));
    }
}
