//! Filename derivation for inbound media.
//!
//! Documents may carry a declared filename; when they do not, the upload
//! name is synthesized from the media kind and file ID, with an extension
//! picked from the declared MIME type.

use courier_core::MediaRef;

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Whether a MIME type is for video.
pub fn is_video(mime: &str) -> bool {
    mime.starts_with("video/")
}

/// Extension for an image MIME type.
fn image_extension(mime: &str) -> &'static str {
    if mime.starts_with("image/png") {
        ".png"
    } else if mime.starts_with("image/webp") {
        ".webp"
    } else if mime.starts_with("image/heic") || mime.starts_with("image/heif") {
        ".heic"
    } else {
        ".jpg"
    }
}

/// Extension for a video MIME type.
fn video_extension(mime: &str) -> &'static str {
    if mime.starts_with("video/quicktime") {
        ".mov"
    } else if mime.starts_with("video/x-msvideo") {
        ".avi"
    } else {
        ".mp4"
    }
}

/// Pick the upload filename for one inbound media item.
///
/// A non-empty declared filename wins unconditionally. Otherwise the name is
/// `<prefix>_<fileID><ext>`; bare photo and video events carry no MIME type
/// and get the family default (`.jpg` / `.mp4`).
pub fn derive_filename(item: &MediaRef) -> String {
    if let Some(name) = item.file_name.as_deref() {
        if !name.is_empty() {
            return name.to_string();
        }
    }

    let mime = item.mime_type.as_deref().unwrap_or("");
    let ext = if item.kind.is_image() {
        image_extension(mime)
    } else {
        video_extension(mime)
    };

    format!("{}_{}{}", item.kind.file_prefix(), item.file_id, ext)
}
