//! Pattern library: pure recognizers for the classifier.
//!
//! Bold markup is handled separately by [`split_bold`] because it decides the
//! run boundaries every other recognizer works within. The remaining
//! recognizers live in [`RECOGNIZERS`] in precedence order.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::segment::{MapTarget, MediaKind, Segment};

/// A recognizer hit inside a text span.
#[derive(Debug, Clone, PartialEq)]
pub struct Found {
    /// Byte offset of the match start in the searched span.
    pub start: usize,
    /// Byte offset one past the match end.
    pub end: usize,
    /// Segment that replaces the matched text.
    pub segment: Segment,
}

/// A named recognizer returning the leftmost match in a span.
#[derive(Clone, Copy)]
pub struct Recognizer {
    pub name: &'static str,
    pub find: fn(&str) -> Option<Found>,
}

impl std::fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recognizer").field("name", &self.name).finish()
    }
}

/// Recognizers applied to every run, earliest first.
///
/// Earlier entries win over later ones on overlapping text.
pub static RECOGNIZERS: [Recognizer; 4] = [
    Recognizer {
        name: "phone",
        find: find_phone,
    },
    Recognizer {
        name: "coordinates",
        find: find_coordinates,
    },
    Recognizer {
        name: "map_url",
        find: find_map_url,
    },
    Recognizer {
        name: "media_url",
        find: find_media_url,
    },
];

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Triple markers are tried first so `***x***` strips all six
    Regex::new(r"\*\*\*([^*]+?)\*\*\*|\*\*([^*]+?)\*\*").expect("bold regex")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Country code, then 8-13 digits with optional single space or hyphen separators
    Regex::new(r"\+\d{1,3}(?:[ \-]?\d){8,13}").expect("phone regex")
});

/// Country code plus the shortest subscriber number.
const MIN_PHONE_DIGITS: usize = 9;

static BRACES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[^{}]*\}").expect("braces regex")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"'`]+"#).expect("url regex")
});

/// Characters dropped from the end of a URL token.
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\''];

/// A run of a line, either inside or outside bold markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoldRun<'a> {
    Plain(&'a str),
    /// Bold content with the markers already stripped.
    Bold(&'a str),
}

/// Split a line into alternating plain and bold runs.
///
/// Empty plain runs between adjacent bold spans are omitted. Unclosed
/// markers stay in the plain text.
pub fn split_bold(line: &str) -> Vec<BoldRun<'_>> {
    let mut runs = Vec::new();
    let mut pos = 0;

    for caps in BOLD_RE.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1).or_else(|| caps.get(2))) else {
            continue;
        };
        if whole.start() > pos {
            runs.push(BoldRun::Plain(&line[pos..whole.start()]));
        }
        runs.push(BoldRun::Bold(inner.as_str()));
        pos = whole.end();
    }

    if pos < line.len() {
        runs.push(BoldRun::Plain(&line[pos..]));
    }

    runs
}

/// Phone numbers with a country-code prefix.
///
/// The number must not run into letters; a digit run too long for one
/// number is cut at its last separator.
pub fn find_phone(text: &str) -> Option<Found> {
    PHONE_RE.find_iter(text).find_map(|m| {
        let end = phone_end(text, m.start(), m.end())?;
        let display = &text[m.start()..end];
        Some(Found {
            start: m.start(),
            end,
            segment: Segment::Phone {
                display: display.to_string(),
                normalized: normalize_phone(display),
            },
        })
    })
}

fn phone_end(text: &str, start: usize, end: usize) -> Option<usize> {
    let end = match text[end..].chars().next() {
        Some(c) if c.is_ascii_digit() => start + text[start..end].rfind([' ', '-'])?,
        Some(c) if c.is_alphanumeric() => return None,
        _ => end,
    };
    let digits = text[start..end].chars().filter(char::is_ascii_digit).count();
    (digits >= MIN_PHONE_DIGITS).then_some(end)
}

/// Keep the leading `+` and digits, drop separators.
pub fn normalize_phone(display: &str) -> String {
    let digits: String = display.chars().filter(char::is_ascii_digit).collect();
    format!("+{}", digits)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CoordinatePayload {
    lat: f64,
    lng: f64,
}

/// `{"lat":..,"lng":..}` payloads with valid coordinates.
///
/// Fragments that are not valid JSON, carry other keys, or hold
/// out-of-range values are skipped.
pub fn find_coordinates(text: &str) -> Option<Found> {
    BRACES_RE.find_iter(text).find_map(|m| {
        let payload: CoordinatePayload = serde_json::from_str(m.as_str()).ok()?;
        if !(-90.0..=90.0).contains(&payload.lat) || !(-180.0..=180.0).contains(&payload.lng) {
            tracing::debug!(fragment = m.as_str(), "coordinates out of range");
            return None;
        }
        Some(Found {
            start: m.start(),
            end: m.end(),
            segment: Segment::Location {
                source: m.as_str().to_string(),
                target: MapTarget::Coordinates {
                    lat: payload.lat,
                    lng: payload.lng,
                },
            },
        })
    })
}

/// Links that already point at a maps service.
pub fn find_map_url(text: &str) -> Option<Found> {
    url_tokens(text)
        .find(|&(start, end)| is_map_url(&text[start..end]))
        .map(|(start, end)| {
            let url = &text[start..end];
            Found {
                start,
                end,
                segment: Segment::Location {
                    source: url.to_string(),
                    target: MapTarget::Url {
                        url: url.to_string(),
                    },
                },
            }
        })
}

/// HTTP(S) links whose path ends in a file extension.
pub fn find_media_url(text: &str) -> Option<Found> {
    url_tokens(text).find_map(|(start, end)| {
        let url = &text[start..end];
        let ext = url_extension(url)?;
        Some(Found {
            start,
            end,
            segment: Segment::Media {
                url: url.to_string(),
                media: MediaKind::from_extension(ext),
            },
        })
    })
}

/// URL spans in `text` with trailing punctuation trimmed.
fn url_tokens(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    URL_RE.find_iter(text).filter_map(|m| {
        let trimmed = m.as_str().trim_end_matches(URL_TRAILING);
        let end = m.start() + trimmed.len();
        // A bare scheme is not a link
        (trimmed.len() > trimmed.find("://")? + 3).then_some((m.start(), end))
    })
}

/// Split a URL into lowercase host (without `www.`) and path.
fn host_and_path(url: &str) -> Option<(String, &str)> {
    let rest = &url[url.find("://")? + 3..];
    let path_start = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let host = rest[..path_start].to_ascii_lowercase();
    let host = host.strip_prefix("www.").map(str::to_string).unwrap_or(host);
    let path = &rest[path_start..];
    let path = &path[..path.find(['?', '#']).unwrap_or(path.len())];
    Some((host, path))
}

fn is_map_url(url: &str) -> bool {
    let Some((host, path)) = host_and_path(url) else {
        return false;
    };
    host.starts_with("maps.google.")
        || host == "maps.app.goo.gl"
        || (host == "goo.gl" && path.starts_with("/maps"))
        || (host.starts_with("google.") && path.starts_with("/maps"))
}

/// File extension of the last path segment, if it has one.
fn url_extension(url: &str) -> Option<&str> {
    let (_, path) = host_and_path(url)?;
    let last = path.rsplit('/').next()?;
    let (stem, ext) = last.rsplit_once('.')?;
    let valid = !stem.is_empty()
        && (1..=5).contains(&ext.len())
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_bold() {
        let runs = split_bold("Hello **world** and ***more***!");
        assert_eq!(
            runs,
            vec![
                BoldRun::Plain("Hello "),
                BoldRun::Bold("world"),
                BoldRun::Plain(" and "),
                BoldRun::Bold("more"),
                BoldRun::Plain("!"),
            ]
        );
    }

    #[test]
    fn test_split_bold_unclosed() {
        assert_eq!(
            split_bold("Hello **world"),
            vec![BoldRun::Plain("Hello **world")]
        );
    }

    #[test]
    fn test_split_bold_adjacent() {
        assert_eq!(
            split_bold("**a****b**"),
            vec![BoldRun::Bold("a"), BoldRun::Bold("b")]
        );
    }

    #[test]
    fn test_phone_with_separators() {
        let found = find_phone("Call +62 821-4517-5076 now").unwrap();
        assert_eq!(found.start, 5);
        assert_eq!(
            found.segment,
            Segment::Phone {
                display: "+62 821-4517-5076".to_string(),
                normalized: "+6282145175076".to_string(),
            }
        );
    }

    #[test]
    fn test_phone_requires_country_code_and_length() {
        assert!(find_phone("0812 3456 7890").is_none());
        assert!(find_phone("+62 812").is_none());
        // too many digits for a single number
        assert!(find_phone("+6281234567890123456").is_none());
    }

    #[test]
    fn test_phone_running_into_letters() {
        assert!(find_phone("+62 812-3456-7890abc").is_none());
        assert!(find_phone("kode +6281234567890x").is_none());

        let found = find_phone("+62 812-3456-7890abc atau +62 821-4517-5076").unwrap();
        assert_eq!(found.start, 26);
        assert_eq!(
            found.segment,
            Segment::Phone {
                display: "+62 821-4517-5076".to_string(),
                normalized: "+6282145175076".to_string(),
            }
        );
    }

    #[test]
    fn test_phone_followed_by_number() {
        let found = find_phone("+62 812-3456-7890 2024").unwrap();
        assert_eq!(found.end, 17);
        assert_eq!(
            found.segment,
            Segment::Phone {
                display: "+62 812-3456-7890".to_string(),
                normalized: "+6281234567890".to_string(),
            }
        );
    }

    #[test]
    fn test_coordinates() {
        let text = r#"at {"lat":-6.2,"lng":106.8}."#;
        let found = find_coordinates(text).unwrap();
        assert_eq!(&text[found.start..found.end], r#"{"lat":-6.2,"lng":106.8}"#);
        match found.segment {
            Segment::Location {
                target: MapTarget::Coordinates { lat, lng },
                ..
            } => {
                assert_eq!(lat, -6.2);
                assert_eq!(lng, 106.8);
            }
            other => panic!("unexpected segment: {:?}", other),
        }
    }

    #[test]
    fn test_coordinates_fail_open() {
        assert!(find_coordinates(r#"{"lat":"x","lng":1}"#).is_none());
        assert!(find_coordinates(r#"{"lat":1}"#).is_none());
        assert!(find_coordinates(r#"{"lat":95,"lng":1}"#).is_none());
        assert!(find_coordinates(r#"{"lat":1,"lng":2,"alt":3}"#).is_none());
        assert!(find_coordinates("{not json}").is_none());
    }

    #[test]
    fn test_coordinates_skips_bad_fragment() {
        let text = r#"{"a":1} then {"lat": 1.5, "lng": 2.5}"#;
        let found = find_coordinates(text).unwrap();
        assert_eq!(found.start, 13);
    }

    #[test]
    fn test_map_urls() {
        assert!(find_map_url("see https://maps.google.com/?q=1,2").is_some());
        assert!(find_map_url("https://www.google.com/maps/place/x").is_some());
        assert!(find_map_url("https://maps.app.goo.gl/abc123").is_some());
        assert!(find_map_url("https://www.google.com/search?q=maps").is_none());
    }

    #[test]
    fn test_map_url_trailing_punctuation() {
        let text = "Here: https://maps.app.goo.gl/abc.";
        let found = find_map_url(text).unwrap();
        assert_eq!(&text[found.start..found.end], "https://maps.app.goo.gl/abc");
    }

    #[test]
    fn test_media_urls() {
        let kind = |s: &str| match find_media_url(s).map(|f| f.segment) {
            Some(Segment::Media { media, .. }) => Some(media),
            _ => None,
        };
        assert_eq!(kind("https://cdn.test/a/photo.png"), Some(MediaKind::Image));
        assert_eq!(kind("https://cdn.test/clip.MP4?token=1"), Some(MediaKind::Video));
        assert_eq!(kind("http://cdn.test/voice.mp3"), Some(MediaKind::Audio));
        assert_eq!(kind("https://cdn.test/report.pdf"), Some(MediaKind::Other));
        assert_eq!(kind("https://example.com"), None);
        assert_eq!(kind("https://example.com/about"), None);
    }

    #[test]
    fn test_recognizer_order() {
        let names: Vec<_> = RECOGNIZERS.iter().map(|r| r.name).collect();
        assert_eq!(names, ["phone", "coordinates", "map_url", "media_url"]);
    }
}
