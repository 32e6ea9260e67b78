use async_trait::async_trait;

use crate::error::UploadError;

/// Destination for relayed media.
///
/// Implementations take ownership of the full file content for the duration
/// of the request; there is no streaming upload.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload one file and return the identifier assigned by the remote API.
    ///
    /// `tags` are attached to the asset when non-empty.
    async fn upload(
        &self,
        content: Vec<u8>,
        filename: &str,
        tags: &[String],
    ) -> Result<String, UploadError>;
}
