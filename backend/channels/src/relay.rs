//! Channel-independent relay pipeline.

use std::sync::Arc;

use tracing::info;

use courier_core::{MediaRef, UploadError, Uploader};
use courier_media::derive_filename;
use courier_metrics::RelayMetrics;

/// Shared state injected into every inbound-event handler.
pub struct RelayContext {
    uploader: Arc<dyn Uploader>,
    metrics: RelayMetrics,
    /// `None` means no restriction; an explicit empty list allows nothing.
    allowed_chats: Option<Vec<i64>>,
}

impl RelayContext {
    pub fn new(
        uploader: Arc<dyn Uploader>,
        metrics: RelayMetrics,
        allowed_chats: Option<Vec<i64>>,
    ) -> Self {
        Self {
            uploader,
            metrics,
            allowed_chats,
        }
    }

    /// Allow-list check for one chat.
    pub fn allows(&self, chat_id: i64) -> bool {
        match &self.allowed_chats {
            None => true,
            Some(ids) => ids.contains(&chat_id),
        }
    }

    /// Upload one fetched media item and record it in the metrics.
    ///
    /// Returns the asset identifier assigned by the remote API. Failures go
    /// back to the caller untouched; nothing is retried.
    pub async fn process_media(
        &self,
        item: &MediaRef,
        content: Vec<u8>,
    ) -> Result<String, UploadError> {
        let filename = derive_filename(item);
        let asset_id = self.uploader.upload(content, &filename, &[]).await?;

        self.metrics.inc_processed(item.kind);
        self.metrics.touch_last_processed();
        info!("Relayed {} as {} (asset {})", item.kind, filename, asset_id);
        Ok(asset_id)
    }
}
