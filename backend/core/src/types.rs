use std::fmt;

/// The media shapes the relay accepts from a chat channel.
///
/// Bare photos and videos carry no declared MIME type or filename; documents
/// may carry both, and only image or video documents are relayed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    DocumentImage,
    DocumentVideo,
}

impl MediaKind {
    /// Label recorded on the processed-files counter.
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::DocumentImage => "document_image",
            MediaKind::DocumentVideo => "document_video",
        }
    }

    /// Prefix used when a filename has to be synthesized.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::DocumentImage => "image",
            MediaKind::DocumentVideo => "video",
        }
    }

    /// Image family (vs. video family).
    pub fn is_image(&self) -> bool {
        matches!(self, MediaKind::Photo | MediaKind::DocumentImage)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reference to one inbound media item, valid for a single event.
#[derive(Debug, Clone)]
pub struct MediaRef {
    pub kind: MediaKind,
    /// Opaque file identifier assigned by the channel.
    pub file_id: String,
    /// MIME type declared by the sender, if any.
    pub mime_type: Option<String>,
    /// Filename declared by the sender, if any.
    pub file_name: Option<String>,
}

impl MediaRef {
    /// Reference with no declared MIME type or filename, as produced by bare
    /// photo and video events.
    pub fn bare(kind: MediaKind, file_id: impl Into<String>) -> Self {
        Self {
            kind,
            file_id: file_id.into(),
            mime_type: None,
            file_name: None,
        }
    }
}
