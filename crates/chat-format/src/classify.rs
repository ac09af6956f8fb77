//! Segment classifier for a single line of text.

use crate::icons::{icon_for, Icon};
use crate::patterns::{split_bold, BoldRun, Recognizer, RECOGNIZERS};
use crate::segment::Segment;

/// Classify one line (no embedded newlines) into ordered segments.
///
/// Bold markup is resolved first. Every run is then split by the
/// recognizers in precedence order, and leftover plain text outside bold
/// runs is annotated with an icon: the run's own keyword when it has one,
/// otherwise the first icon found anywhere in the line's plain text.
///
/// An empty line yields a single empty text segment.
pub fn classify_line(line: &str) -> Vec<Segment> {
    if line.is_empty() {
        return vec![Segment::text("")];
    }

    let mut segments = Vec::new();
    for run in split_bold(line) {
        match run {
            BoldRun::Plain(text) => split_run(text, &RECOGNIZERS, &mut segments),
            BoldRun::Bold(text) => {
                let mut children = Vec::new();
                split_run(text, &RECOGNIZERS, &mut children);
                segments.push(Segment::Bold { children });
            }
        }
    }

    annotate_icons(&mut segments);
    segments
}

/// Apply `recognizers[0]` left to right across `text`, handing the gaps
/// between its matches to the remaining recognizers.
fn split_run(text: &str, recognizers: &[Recognizer], out: &mut Vec<Segment>) {
    if text.is_empty() {
        return;
    }
    let Some((first, rest)) = recognizers.split_first() else {
        out.push(Segment::text(text));
        return;
    };

    let mut cursor = 0;
    while cursor < text.len() {
        let Some(found) = (first.find)(&text[cursor..]) else {
            break;
        };
        if found.end <= found.start {
            break;
        }
        split_run(&text[cursor..cursor + found.start], rest, out);
        out.push(found.segment);
        cursor += found.end;
    }
    split_run(&text[cursor..], rest, out);
}

/// Attach icons to top-level plain text segments.
fn annotate_icons(segments: &mut [Segment]) {
    let own: Vec<Option<Icon>> = segments
        .iter()
        .map(|segment| match segment {
            Segment::Text { text, .. } => icon_for(text),
            _ => None,
        })
        .collect();
    let context = own.iter().flatten().next().copied();

    for (segment, own_icon) in segments.iter_mut().zip(own) {
        if let Segment::Text { text, icon } = segment {
            if !text.trim().is_empty() {
                *icon = own_icon.or(context);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{source_text, MapTarget, MediaKind};

    #[test]
    fn test_plain_line() {
        assert_eq!(
            classify_line("Halo ibu"),
            vec![Segment::text("Halo ibu")]
        );
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(classify_line(""), vec![Segment::text("")]);
        assert_eq!(classify_line("   "), vec![Segment::text("   ")]);
    }

    #[test]
    fn test_phone_beats_media() {
        let segments = classify_line("+62 812 3456 7890 https://cdn.test/a.jpg");
        let kinds: Vec<_> = segments.iter().map(Segment::kind).collect();
        assert_eq!(kinds, ["phone", "text", "media"]);
    }

    #[test]
    fn test_phone_inside_bold() {
        let segments = classify_line("**Darurat +62 812-3456-7890**");
        assert_eq!(segments.len(), 1);
        match &segments[0] {
            Segment::Bold { children } => {
                assert_eq!(children[0], Segment::text("Darurat "));
                assert!(matches!(children[1], Segment::Phone { .. }));
            }
            other => panic!("expected bold, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_matches_same_pattern() {
        let segments = classify_line(
            "https://cdn.test/a.png dan https://cdn.test/b.mp3",
        );
        assert_eq!(
            segments,
            vec![
                Segment::Media {
                    url: "https://cdn.test/a.png".to_string(),
                    media: MediaKind::Image,
                },
                Segment::text(" dan "),
                Segment::Media {
                    url: "https://cdn.test/b.mp3".to_string(),
                    media: MediaKind::Audio,
                },
            ]
        );
    }

    #[test]
    fn test_map_link_before_media() {
        let segments = classify_line("https://maps.google.com/a.png");
        assert!(matches!(
            &segments[0],
            Segment::Location {
                target: MapTarget::Url { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_run_icon_beats_context() {
        let segments = classify_line("Lokasi +62 812 3456 7890 panggilan");
        assert_eq!(
            segments[0],
            Segment::Text {
                text: "Lokasi ".to_string(),
                icon: Some(Icon::Location),
            }
        );
        assert_eq!(
            segments[2],
            Segment::Text {
                text: " panggilan".to_string(),
                icon: Some(Icon::Phone),
            }
        );
    }

    #[test]
    fn test_whitespace_run_not_annotated() {
        let segments = classify_line("Lokasi https://cdn.test/a.png https://cdn.test/b.png");
        assert_eq!(segments[2], Segment::text(" "));
    }

    #[test]
    fn test_source_text_preserved() {
        let line = r#"Foto **penting**: https://x.test/p.jpg, {"lat":1,"lng":2} +1 202 555 0143!"#;
        let segments = classify_line(line);
        assert_eq!(
            source_text(&segments),
            line.replace("**", "")
        );
    }

    #[test]
    fn test_idempotent() {
        let line = "Lihat https://maps.app.goo.gl/xyz sekarang";
        assert_eq!(classify_line(line), classify_line(line));
    }
}
