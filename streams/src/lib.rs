// NTFS alternate data stream access layer
// Stateless functions and capability objects over the Win32 stream APIs:
// enumerate the named streams on an entry, open one for read/write,
// delete one or all of them. Non-Windows builds compile to stubs that
// report PlatformNotSupported.

pub mod delete;
pub mod enumerate;
pub mod handle;
pub mod name;
pub mod text;

#[cfg(target_os = "windows")]
pub(crate) mod winutil;

// Re-export main types
pub use adsview_core::{AdsError, StreamDescriptor};
pub use delete::{delete, delete_all, DeleteSummary, StreamFailure};
pub use enumerate::{exists, list, StreamList};
pub use handle::{OpenMode, StreamHandle};
pub use text::decode_text;
