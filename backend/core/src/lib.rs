pub mod error;
pub mod traits;
pub mod types;

pub use error::UploadError;
pub use traits::Uploader;
pub use types::{MediaKind, MediaRef};
