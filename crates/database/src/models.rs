//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A child profile owned by a parent account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Child {
    /// Generated UUID.
    pub id: String,
    /// Owning parent account ID (from the auth provider).
    pub parent_id: String,
    /// Display name.
    pub name: String,
    /// Date of birth (`YYYY-MM-DD`).
    pub date_of_birth: Option<String>,
    /// `male` or `female`.
    pub sex: Option<String>,
    /// Pairing code the child device scans to link itself.
    pub qr_code: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Fields supplied when adding a child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChild {
    pub parent_id: String,
    pub name: String,
    pub date_of_birth: Option<String>,
    pub sex: Option<String>,
}

/// Who sent a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SenderRole {
    Parent,
    Child,
}

impl SenderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Child => "child",
        }
    }
}

/// Kind of file attached to a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Video,
    Audio,
    Location,
    Document,
}

impl AttachmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Location => "location",
            Self::Document => "document",
        }
    }
}

/// A message exchanged between a parent and a child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    /// Auto-incrementing ID.
    pub id: i64,
    pub child_id: String,
    pub parent_id: String,
    pub sender_role: SenderRole,
    /// Message body.
    pub message: String,
    /// Public URL of an uploaded attachment.
    pub file_url: Option<String>,
    pub file_type: Option<AttachmentKind>,
    pub file_name: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Whether the recipient has seen the message.
    pub is_read: bool,
}

/// Fields supplied when sending a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChatMessage {
    pub child_id: String,
    pub parent_id: String,
    pub sender_role: SenderRole,
    pub message: String,
    pub file_url: Option<String>,
    pub file_type: Option<AttachmentKind>,
    pub file_name: Option<String>,
    /// Explicit timestamp for imported messages; `None` uses the current time.
    pub created_at: Option<String>,
}

/// A location fix reported by a child device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: i64,
    pub child_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy in meters.
    pub accuracy: Option<f64>,
    pub timestamp: String,
}

/// Direction or outcome of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CallType {
    Incoming,
    Outgoing,
    Missed,
    Rejected,
}

/// A call recorded on a child device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CallLog {
    pub id: i64,
    pub child_id: String,
    pub phone_number: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub call_type: CallType,
    /// Duration in seconds.
    pub duration: i64,
    pub timestamp: String,
}

/// A scheduled activity for a child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Schedule {
    pub id: i64,
    pub child_id: String,
    /// ISO weekday, 1 = Monday through 7 = Sunday.
    pub day_of_week: i64,
    /// `HH:MM`.
    pub start_time: String,
    /// `HH:MM`.
    pub end_time: String,
    pub activity_type: String,
    pub description: Option<String>,
    /// `low`, `medium` or `high`.
    pub urgency: String,
    /// `once`, `daily`, `weekly` or `monthly`.
    pub recurrence: String,
    /// Minutes before start to notify.
    pub notify_before: i64,
    /// `pending`, `done` or `skipped`.
    pub status: String,
}

/// Fields supplied when creating a schedule entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSchedule {
    pub child_id: String,
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    pub activity_type: String,
    pub description: Option<String>,
    pub urgency: String,
    pub recurrence: String,
    pub notify_before: i64,
}

/// A named geofence around a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SafeZone {
    pub id: i64,
    pub child_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Radius in meters.
    pub radius_m: f64,
    pub created_at: String,
}

/// Last known online state of a child device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Presence {
    pub child_id: String,
    pub is_online: bool,
    pub last_seen: String,
}

/// A question asked to the AI assistant and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AssistantMessage {
    pub id: i64,
    pub parent_id: String,
    pub question: String,
    pub answer: String,
    pub created_at: String,
}
