pub mod error;
pub mod stream;

pub use error::AdsError;
pub use stream::StreamDescriptor;
