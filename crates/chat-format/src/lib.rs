//! Chat message classification.
//!
//! Turns a raw chat message into an ordered list of typed [`Segment`]s that a
//! renderer maps onto UI elements. Everything here is pure and synchronous.
//!
//! # Pipeline
//!
//! ```text
//! raw message
//!      ↓
//! format_message   split on line breaks, insert LineBreak markers
//!      ↓
//! classify_line    per line:
//!                   1. bold markup (**x** / ***x***)
//!                   2. phone numbers
//!                   3. {"lat":..,"lng":..} payloads
//!                   4. maps links
//!                   5. media links
//!                   6. icon for leftover text
//!      ↓
//! Vec<Segment>
//! ```
//!
//! # Example
//!
//! ```
//! use chat_format::{format_message, Segment};
//!
//! let message = format_message("Hubungi +62 812-3456-7890 sekarang");
//! assert!(matches!(message.segments[1], Segment::Phone { .. }));
//! ```

pub mod assemble;
pub mod classify;
pub mod icons;
pub mod patterns;
pub mod preview;
pub mod segment;

pub use assemble::{format_message, FormattedMessage};
pub use classify::classify_line;
pub use icons::{icon_for, Icon};
pub use patterns::{Recognizer, RECOGNIZERS};
pub use preview::preview;
pub use segment::{source_text, MapTarget, MediaKind, Segment};
