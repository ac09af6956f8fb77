//! Line assembler: classify a full message line by line.

use serde::Serialize;

use crate::classify::classify_line;
use crate::segment::Segment;

/// A classified message ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormattedMessage {
    /// Segments of every line, separated by [`Segment::LineBreak`].
    pub segments: Vec<Segment>,
}

impl FormattedMessage {
    /// Number of explicit line break markers.
    pub fn line_break_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_line_break()).count()
    }

    /// Segments grouped per input line.
    pub fn lines(&self) -> Vec<&[Segment]> {
        self.segments.split(Segment::is_line_break).collect()
    }

    /// Whether any segment carries an affordance beyond plain text.
    pub fn has_rich_content(&self) -> bool {
        fn rich(segment: &Segment) -> bool {
            match segment {
                Segment::Text { .. } | Segment::LineBreak => false,
                Segment::Bold { children } => children.iter().any(rich),
                _ => true,
            }
        }
        self.segments.iter().any(rich)
    }
}

/// Classify a full message.
///
/// The text is split on `\n` (a trailing `\r` on each line is dropped) and
/// every line is classified on its own, so nothing is ever matched across
/// a line break.
pub fn format_message(text: &str) -> FormattedMessage {
    let mut segments = Vec::new();

    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            segments.push(Segment::LineBreak);
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        segments.extend(classify_line(line));
    }

    FormattedMessage { segments }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_has_no_breaks() {
        let message = format_message("Halo");
        assert_eq!(message.line_break_count(), 0);
        assert_eq!(message.lines().len(), 1);
    }

    #[test]
    fn test_blank_lines_preserved() {
        let message = format_message("a\n\nb\n");
        assert_eq!(message.line_break_count(), 3);
        let lines = message.lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], &[Segment::text("")]);
        assert_eq!(lines[3], &[Segment::text("")]);
    }

    #[test]
    fn test_crlf() {
        let message = format_message("a\r\nb");
        assert_eq!(
            message.segments,
            vec![Segment::text("a"), Segment::LineBreak, Segment::text("b")]
        );
    }

    #[test]
    fn test_phone_split_across_lines_not_detected() {
        let message = format_message("+62 812\n3456 7890");
        assert!(!message.has_rich_content());
    }

    #[test]
    fn test_rich_content_inside_bold() {
        let message = format_message("**+62 812 3456 7890**");
        assert!(message.has_rich_content());
    }
}
