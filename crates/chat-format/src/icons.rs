//! Keyword and emoji heuristics for annotating plain text with an icon.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Contextual icon attached to a plain text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Location,
    Phone,
    Chat,
    Image,
    Audio,
    Video,
    Time,
    Safe,
    Danger,
    Analysis,
}

impl Icon {
    /// Glyph shown in front of the text.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Location => "📍",
            Self::Phone => "📞",
            Self::Chat => "💬",
            Self::Image => "🖼️",
            Self::Audio => "🎵",
            Self::Video => "🎥",
            Self::Time => "🕒",
            Self::Safe => "🛡️",
            Self::Danger => "⚠️",
            Self::Analysis => "📊",
        }
    }

    /// Accent color for the glyph.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Location => "#2563eb",
            Self::Phone => "#16a34a",
            Self::Chat => "#7c3aed",
            Self::Image => "#db2777",
            Self::Audio => "#ea580c",
            Self::Video => "#dc2626",
            Self::Time => "#4b5563",
            Self::Safe => "#059669",
            Self::Danger => "#b91c1c",
            Self::Analysis => "#0891b2",
        }
    }
}

/// Build a case-insensitive matcher for whole words plus bare emoji.
fn keyword_regex(words: &[&str], emoji: &[&str]) -> Regex {
    let words = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    let emoji = emoji
        .iter()
        .map(|e| regex::escape(e))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b|{}", words, emoji)).expect("static icon keyword pattern")
}

/// Ordered icon table. The first entry that matches wins.
static ICON_TABLE: LazyLock<Vec<(Regex, Icon)>> = LazyLock::new(|| {
    vec![
        (
            keyword_regex(
                &["lokasi", "location", "alamat", "address", "posisi", "koordinat", "peta", "map"],
                &["📍", "🗺"],
            ),
            Icon::Location,
        ),
        (
            keyword_regex(
                &["telepon", "telpon", "panggilan", "call", "calls", "phone"],
                &["📞", "☎"],
            ),
            Icon::Phone,
        ),
        (
            keyword_regex(&["chat", "pesan", "message", "messages", "obrolan"], &["💬"]),
            Icon::Chat,
        ),
        (
            keyword_regex(&["foto", "gambar", "image", "photo", "picture"], &["📷", "📸", "🖼"]),
            Icon::Image,
        ),
        (
            keyword_regex(&["audio", "suara", "rekaman", "voice", "recording"], &["🎵", "🎤", "🔊"]),
            Icon::Audio,
        ),
        (
            keyword_regex(&["video"], &["🎥", "🎬", "📹"]),
            Icon::Video,
        ),
        (
            Regex::new(r"\[\d{1,2}[:.]\d{2}(?:[:.]\d{2})?\]|⏰|🕒").expect("static timestamp pattern"),
            Icon::Time,
        ),
        (
            keyword_regex(&["aman", "safe", "terlindungi", "protected"], &["✅", "🛡"]),
            Icon::Safe,
        ),
        (
            keyword_regex(
                &["bahaya", "danger", "darurat", "emergency", "waspada", "warning", "peringatan"],
                &["⚠", "🚨", "❗"],
            ),
            Icon::Danger,
        ),
        (
            keyword_regex(
                &["analisis", "analysis", "ringkasan", "summary", "laporan", "report", "aktivitas"],
                &["📊", "📈"],
            ),
            Icon::Analysis,
        ),
    ]
});

/// Pick the icon for a text run, if any keyword or emoji matches.
///
/// Whitespace-only input never gets an icon.
pub fn icon_for(text: &str) -> Option<Icon> {
    if text.trim().is_empty() {
        return None;
    }
    ICON_TABLE
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, icon)| *icon)
}
