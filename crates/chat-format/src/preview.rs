//! One-line previews for message lists.

use crate::assemble::format_message;
use crate::segment::{MediaKind, Segment};

/// Ellipsis appended to truncated previews.
const ELLIPSIS: &str = "…";

/// Short single-line preview of a message for overview lists.
///
/// Locations and media collapse into labels, line breaks become spaces,
/// and the result is cut to `max_chars` characters.
pub fn preview(text: &str, max_chars: usize) -> String {
    let message = format_message(text);
    let mut out = String::new();
    for segment in &message.segments {
        push_preview(segment, &mut out);
    }

    let collapsed = out.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, max_chars)
}

fn push_preview(segment: &Segment, out: &mut String) {
    match segment {
        Segment::Text { text, .. } => out.push_str(text),
        Segment::Bold { children } => children.iter().for_each(|c| push_preview(c, out)),
        Segment::Phone { display, .. } => out.push_str(display),
        Segment::Location { .. } => out.push_str("📍 Location"),
        Segment::Media { media, .. } => out.push_str(match media {
            MediaKind::Image => "🖼️ Photo",
            MediaKind::Video => "🎥 Video",
            MediaKind::Audio => "🎵 Audio",
            MediaKind::Other => "📎 File",
        }),
        Segment::LineBreak => out.push(' '),
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}{}", kept.trim_end(), ELLIPSIS)
}
