//! Flat view models for rendering classified messages in templates.

use chat_format::{format_message, Icon, MediaKind, Segment};
use chrono::{DateTime, Utc};
use database::ChatMessage;
use monitor_core::{relative_time, DeliveryState, Entry};

/// One renderable span of a line.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentView {
    /// `text`, `phone`, `map`, `image`, `video`, `audio`, or `file`.
    pub kind: &'static str,
    pub text: String,
    /// Link target; empty for plain text.
    pub href: String,
    pub bold: bool,
    /// Icon glyph; empty when the span has none.
    pub icon: &'static str,
    pub icon_color: &'static str,
}

impl SegmentView {
    fn plain(text: &str, icon: Option<Icon>, bold: bool) -> Self {
        Self {
            kind: "text",
            text: text.to_string(),
            href: String::new(),
            bold,
            icon: icon.map(|i| i.glyph()).unwrap_or_default(),
            icon_color: icon.map(|i| i.color()).unwrap_or_default(),
        }
    }

    fn link(kind: &'static str, text: &str, href: String, bold: bool) -> Self {
        Self {
            kind,
            text: text.to_string(),
            href,
            bold,
            icon: "",
            icon_color: "",
        }
    }
}

/// Render a message body as lines of flat spans.
pub fn render_lines(text: &str) -> Vec<Vec<SegmentView>> {
    format_message(text)
        .lines()
        .into_iter()
        .map(|line| {
            let mut views = Vec::new();
            for segment in line {
                flatten(segment, false, &mut views);
            }
            views
        })
        .collect()
}

fn flatten(segment: &Segment, bold: bool, out: &mut Vec<SegmentView>) {
    match segment {
        Segment::Text { text, icon } => out.push(SegmentView::plain(text, *icon, bold)),
        Segment::Bold { children } => {
            for child in children {
                flatten(child, true, out);
            }
        }
        Segment::Phone {
            display,
            normalized,
        } => out.push(SegmentView::link(
            "phone",
            display,
            format!("tel:{}", normalized),
            bold,
        )),
        Segment::Location { target, .. } => {
            out.push(SegmentView::link("map", "View on map", target.href(), bold))
        }
        Segment::Media { url, media } => {
            let kind = match media {
                MediaKind::Image => "image",
                MediaKind::Video => "video",
                MediaKind::Audio => "audio",
                MediaKind::Other => "file",
            };
            let label = url.rsplit('/').next().unwrap_or(url);
            out.push(SegmentView::link(kind, label, url.clone(), bold));
        }
        Segment::LineBreak => {}
    }
}

/// A chat message prepared for the chat page.
#[derive(Debug, Clone)]
pub struct MessageView {
    /// `parent` or `child`.
    pub role: &'static str,
    pub lines: Vec<Vec<SegmentView>>,
    /// Attached file, if any. Only `http(s)` links are kept.
    pub attachment_url: String,
    pub attachment_kind: &'static str,
    pub attachment_name: String,
    pub time: String,
    pub is_read: bool,
}

impl MessageView {
    pub fn new(message: &ChatMessage, now: DateTime<Utc>) -> Self {
        let attachment_url = message
            .file_url
            .as_deref()
            .filter(|url| database::validation::is_web_url(url))
            .unwrap_or_default()
            .to_string();
        let attachment_name = message
            .file_name
            .clone()
            .unwrap_or_else(|| attachment_url.rsplit('/').next().unwrap_or_default().to_string());

        Self {
            role: message.sender_role.as_str(),
            lines: if message.message.is_empty() {
                Vec::new()
            } else {
                render_lines(&message.message)
            },
            attachment_kind: message.file_type.map(|kind| kind.as_str()).unwrap_or("document"),
            attachment_url,
            attachment_name,
            time: relative_time(&message.created_at, now),
            is_read: message.is_read,
        }
    }
}

/// An assistant conversation entry prepared for the assistant page.
#[derive(Debug, Clone)]
pub struct AssistantEntryView {
    /// `user` or `assistant`.
    pub role: &'static str,
    pub lines: Vec<Vec<SegmentView>>,
    pub pending: bool,
    pub failed: bool,
}

impl From<&Entry> for AssistantEntryView {
    fn from(entry: &Entry) -> Self {
        let role = match entry.role {
            monitor_core::Role::User | monitor_core::Role::Parent => "user",
            monitor_core::Role::Assistant | monitor_core::Role::Child => "assistant",
        };
        Self {
            role,
            lines: render_lines(&entry.text),
            pending: entry.delivery.is_pending(),
            failed: matches!(entry.delivery, DeliveryState::Failed { .. }),
        }
    }
}
