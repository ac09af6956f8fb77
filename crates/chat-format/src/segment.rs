//! Segment types produced by the classifier.

use serde::Serialize;

use crate::icons::Icon;

/// One classified span of a chat line.
///
/// Segments are derived on every render and never persisted. The text each
/// segment was built from is available through [`Segment::source_text`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Plain text, optionally annotated with a contextual icon.
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        icon: Option<Icon>,
    },
    /// Text that was wrapped in `**` or `***` markers.
    ///
    /// The inner text is classified again, so phone numbers and links
    /// inside bold markup keep their affordances.
    Bold { children: Vec<Segment> },
    /// A phone number with a call affordance.
    Phone {
        /// Original text as written in the message.
        display: String,
        /// `+` followed by digits only, suitable for a `tel:` link.
        normalized: String,
    },
    /// A "view on map" affordance.
    Location {
        /// The matched text (JSON fragment or URL).
        source: String,
        target: MapTarget,
    },
    /// A media or file link.
    Media { url: String, media: MediaKind },
    /// Explicit line break inserted between lines of a message.
    LineBreak,
}

impl Segment {
    /// Plain text segment without an icon.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            icon: None,
        }
    }

    /// The literal message text this segment covers.
    ///
    /// Bold markers and injected icons are not part of it; line breaks map
    /// back to `\n`.
    pub fn source_text(&self) -> String {
        match self {
            Self::Text { text, .. } => text.clone(),
            Self::Bold { children } => children.iter().map(Segment::source_text).collect(),
            Self::Phone { display, .. } => display.clone(),
            Self::Location { source, .. } => source.clone(),
            Self::Media { url, .. } => url.clone(),
            Self::LineBreak => "\n".to_string(),
        }
    }

    /// Short name of the segment kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { icon: Some(_), .. } => "icon_text",
            Self::Text { icon: None, .. } => "text",
            Self::Bold { .. } => "bold",
            Self::Phone { .. } => "phone",
            Self::Location { .. } => "location",
            Self::Media { .. } => "media",
            Self::LineBreak => "line_break",
        }
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self, Self::LineBreak)
    }
}

/// Where a location segment points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapTarget {
    /// Coordinates extracted from a `{"lat":..,"lng":..}` payload.
    Coordinates { lat: f64, lng: f64 },
    /// An already formed maps link, reused verbatim.
    Url { url: String },
}

impl MapTarget {
    /// Link that opens the target in a map view.
    pub fn href(&self) -> String {
        match self {
            Self::Coordinates { lat, lng } => {
                format!("https://www.google.com/maps?q={},{}", lat, lng)
            }
            Self::Url { url } => url.clone(),
        }
    }
}

/// Media classification by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Other,
}

impl MediaKind {
    const IMAGE: &'static [&'static str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "heic"];
    const VIDEO: &'static [&'static str] = &["mp4", "webm", "mov", "mkv", "avi", "3gp"];
    const AUDIO: &'static [&'static str] = &["mp3", "wav", "ogg", "m4a", "aac", "opus", "flac"];

    /// Classify a file extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        if Self::IMAGE.contains(&ext.as_str()) {
            Self::Image
        } else if Self::VIDEO.contains(&ext.as_str()) {
            Self::Video
        } else if Self::AUDIO.contains(&ext.as_str()) {
            Self::Audio
        } else {
            Self::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Other => "other",
        }
    }
}

/// Concatenate the source text of a segment list.
pub fn source_text(segments: &[Segment]) -> String {
    segments.iter().map(Segment::source_text).collect()
}
