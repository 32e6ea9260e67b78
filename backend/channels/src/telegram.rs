//! Telegram listener.
//!
//! Long-polls the Bot API and relays every accepted photo, video, and media
//! document through the pipeline. One dispatch branch per media kind; text
//! and other update types are ignored.

use std::sync::Arc;

use anyhow::Result;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::Document;
use tracing::{info, warn};

use courier_core::{MediaKind, MediaRef};
use courier_media::{is_image, is_video};

use crate::relay::RelayContext;

/// Telegram long-polling adapter.
pub struct TelegramRelay {
    bot: Bot,
    ctx: Arc<RelayContext>,
}

impl TelegramRelay {
    pub fn new(token: &str, ctx: Arc<RelayContext>) -> Self {
        Self {
            bot: Bot::new(token),
            ctx,
        }
    }

    /// Run the dispatcher until ctrl-c.
    pub async fn run(self) {
        info!("Starting Telegram listener");

        let handler = Update::filter_message()
            .branch(dptree::filter(|msg: Message| msg.photo().is_some()).endpoint(on_photo))
            .branch(dptree::filter(|msg: Message| msg.video().is_some()).endpoint(on_video))
            .branch(dptree::filter(|msg: Message| msg.document().is_some()).endpoint(on_document));

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.ctx])
            // Non-media updates are none of our business.
            .default_handler(|_upd| async {})
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

async fn on_photo(bot: Bot, msg: Message, ctx: Arc<RelayContext>) -> ResponseResult<()> {
    if !ctx.allows(msg.chat.id.0) {
        info!("Chat {} is not allow-listed, ignoring photo", msg.chat.id);
        return Ok(());
    }
    // Telegram sends several renditions; the last one is the largest.
    let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) else {
        return Ok(());
    };

    let item = MediaRef::bare(MediaKind::Photo, photo.file.id.clone());
    relay(&bot, &msg, &ctx, item, "Couldn't fetch the photo.").await
}

async fn on_video(bot: Bot, msg: Message, ctx: Arc<RelayContext>) -> ResponseResult<()> {
    if !ctx.allows(msg.chat.id.0) {
        info!("Chat {} is not allow-listed, ignoring video", msg.chat.id);
        return Ok(());
    }
    let Some(video) = msg.video() else {
        return Ok(());
    };

    let item = MediaRef::bare(MediaKind::Video, video.file.id.clone());
    relay(&bot, &msg, &ctx, item, "Couldn't fetch the video.").await
}

async fn on_document(bot: Bot, msg: Message, ctx: Arc<RelayContext>) -> ResponseResult<()> {
    if !ctx.allows(msg.chat.id.0) {
        info!("Chat {} is not allow-listed, ignoring document", msg.chat.id);
        return Ok(());
    }
    let Some(doc) = msg.document() else {
        return Ok(());
    };
    // Documents that are neither images nor videos are dropped silently.
    let Some(item) = document_media(doc) else {
        return Ok(());
    };

    relay(&bot, &msg, &ctx, item, "Couldn't fetch the file.").await
}

/// Classify a document by its declared MIME type.
fn document_media(doc: &Document) -> Option<MediaRef> {
    let mime = doc.mime_type.as_ref()?.essence_str().to_owned();
    let kind = if is_image(&mime) {
        MediaKind::DocumentImage
    } else if is_video(&mime) {
        MediaKind::DocumentVideo
    } else {
        return None;
    };

    Some(MediaRef {
        kind,
        file_id: doc.file.id.clone(),
        mime_type: Some(mime),
        file_name: doc.file_name.clone(),
    })
}

/// Fetch the file behind `item` and hand it to the pipeline, reporting
/// failures back to the chat. Every failure drops the event; nothing retries.
async fn relay(
    bot: &Bot,
    msg: &Message,
    ctx: &RelayContext,
    item: MediaRef,
    fetch_error_reply: &str,
) -> ResponseResult<()> {
    let content = match fetch_file(bot, &item.file_id).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to fetch {} {}: {}", item.kind, item.file_id, e);
            bot.send_message(msg.chat.id, fetch_error_reply).await?;
            return Ok(());
        }
    };

    if let Err(e) = ctx.process_media(&item, content).await {
        warn!("Upload of {} failed: {}", item.file_id, e);
        bot.send_message(msg.chat.id, format!("Failed to upload to Immich: {e}"))
            .await?;
    }
    Ok(())
}

/// Download the full file content for a Telegram file ID into memory.
async fn fetch_file(bot: &Bot, file_id: &str) -> Result<Vec<u8>> {
    let file = bot.get_file(file_id).await?;
    let mut content = Vec::new();
    bot.download_file(&file.path, &mut content).await?;
    Ok(content)
}
