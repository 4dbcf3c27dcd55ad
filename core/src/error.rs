use thiserror::Error;

/// Typed failure taxonomy for the stream access layer.
///
/// Every operation surfaces one of these variants; callers can map each
/// kind to its own diagnostic rather than pattern-matching message text.
#[derive(Debug, Error)]
pub enum AdsError {
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Entry not accessible: {0}")]
    EntryInaccessible(String),

    #[error("Stream not found: {0}")]
    StreamNotFound(String),

    #[error("Invalid stream name: {0}")]
    InvalidName(String),

    #[error("Malformed stream record: {0}")]
    Malformed(String),

    #[error("Stream is not valid text: {0}")]
    DecodeError(String),

    #[error("Platform not supported: {0}")]
    PlatformNotSupported(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AdsError {
    /// Build an `IoError` from a raw OS error code (e.g. `GetLastError`).
    pub fn from_os_error(code: u32) -> Self {
        AdsError::IoError(std::io::Error::from_raw_os_error(code as i32))
    }
}
