//! Input validation for rows written from the dashboard.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};

use crate::models::{NewChatMessage, NewChild, NewSchedule};

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Value outside the accepted set or range.
    InvalidValue { field: String, value: String },
    /// Date not in `YYYY-MM-DD` form or in the future.
    InvalidDate(String),
    /// Time not in `HH:MM` form.
    InvalidTime(String),
    /// Start time is not before end time.
    InvalidTimeRange { start: String, end: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::InvalidValue { field, value } => {
                write!(f, "Invalid {}: {}", field, value)
            }
            ValidationError::InvalidDate(msg) => write!(f, "Invalid date: {}", msg),
            ValidationError::InvalidTime(value) => {
                write!(f, "Invalid time '{}' (expected HH:MM)", value)
            }
            ValidationError::InvalidTimeRange { start, end } => {
                write!(f, "Start time {} must be before end time {}", start, end)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for a child's name.
pub const MAX_NAME_LENGTH: usize = 80;

/// Maximum allowed length for a chat message body.
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Maximum allowed length for a schedule activity type.
pub const MAX_ACTIVITY_LENGTH: usize = 64;

/// Maximum notification lead time in minutes (one day).
pub const MAX_NOTIFY_BEFORE: i64 = 1440;

/// Accepted safe-zone radius in meters.
pub const SAFE_ZONE_RADIUS_M: std::ops::RangeInclusive<f64> = 10.0..=50_000.0;

pub const SEX_VALUES: &[&str] = &["male", "female"];
pub const URGENCY_VALUES: &[&str] = &["low", "medium", "high"];
pub const RECURRENCE_VALUES: &[&str] = &["once", "daily", "weekly", "monthly"];
pub const STATUS_VALUES: &[&str] = &["pending", "done", "skipped"];

fn require_text(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }

    Ok(())
}

fn require_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

/// Validate the fields of a new child.
pub fn validate_child(child: &NewChild) -> Result<(), ValidationError> {
    require_text("parent_id", &child.parent_id, 128)?;
    require_text("name", &child.name, MAX_NAME_LENGTH)?;

    if let Some(dob) = &child.date_of_birth {
        validate_date_of_birth(dob)?;
    }
    if let Some(sex) = &child.sex {
        require_one_of("sex", sex, SEX_VALUES)?;
    }

    Ok(())
}

/// Validate a `YYYY-MM-DD` date of birth that is not in the future.
pub fn validate_date_of_birth(value: &str) -> Result<(), ValidationError> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(format!("'{}' is not YYYY-MM-DD", value)))?;

    if date > chrono::Utc::now().date_naive() {
        return Err(ValidationError::InvalidDate(format!(
            "'{}' is in the future",
            value
        )));
    }

    Ok(())
}

/// Whether `url` is an absolute `http` or `https` URL.
pub fn is_web_url(url: &str) -> bool {
    let url = url.trim();
    url.split_once("://").is_some_and(|(scheme, rest)| {
        !rest.is_empty()
            && (scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https"))
    })
}

/// Validate a chat message before sending.
///
/// A message needs either a body or an attachment URL. Attachments must
/// be `http(s)` links.
pub fn validate_chat_message(message: &NewChatMessage) -> Result<(), ValidationError> {
    let file_url = message
        .file_url
        .as_deref()
        .filter(|url| !url.trim().is_empty());

    if message.message.trim().is_empty() && file_url.is_none() {
        return Err(ValidationError::Empty("message".to_string()));
    }

    if let Some(url) = file_url {
        if !is_web_url(url) {
            return Err(ValidationError::InvalidValue {
                field: "file_url".to_string(),
                value: url.to_string(),
            });
        }
    }

    let actual = message.message.chars().count();
    if actual > MAX_MESSAGE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "message".to_string(),
            max: MAX_MESSAGE_LENGTH,
            actual,
        });
    }

    Ok(())
}

/// Validate a latitude/longitude pair.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ValidationError::InvalidValue {
            field: "latitude".to_string(),
            value: latitude.to_string(),
        });
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ValidationError::InvalidValue {
            field: "longitude".to_string(),
            value: longitude.to_string(),
        });
    }
    Ok(())
}

/// Parse an `HH:MM` time.
pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))
}

/// Validate a new schedule entry.
pub fn validate_schedule(schedule: &NewSchedule) -> Result<(), ValidationError> {
    if !(1..=7).contains(&schedule.day_of_week) {
        return Err(ValidationError::InvalidValue {
            field: "day_of_week".to_string(),
            value: schedule.day_of_week.to_string(),
        });
    }

    let start = parse_time(&schedule.start_time)?;
    let end = parse_time(&schedule.end_time)?;
    if start >= end {
        return Err(ValidationError::InvalidTimeRange {
            start: schedule.start_time.clone(),
            end: schedule.end_time.clone(),
        });
    }

    require_text("activity_type", &schedule.activity_type, MAX_ACTIVITY_LENGTH)?;
    require_one_of("urgency", &schedule.urgency, URGENCY_VALUES)?;
    require_one_of("recurrence", &schedule.recurrence, RECURRENCE_VALUES)?;

    if !(0..=MAX_NOTIFY_BEFORE).contains(&schedule.notify_before) {
        return Err(ValidationError::InvalidValue {
            field: "notify_before".to_string(),
            value: schedule.notify_before.to_string(),
        });
    }

    Ok(())
}

/// Validate a schedule status value.
pub fn validate_status(status: &str) -> Result<(), ValidationError> {
    require_one_of("status", status, STATUS_VALUES)
}

/// Validate a safe zone definition.
pub fn validate_safe_zone(
    name: &str,
    latitude: f64,
    longitude: f64,
    radius_m: f64,
) -> Result<(), ValidationError> {
    require_text("name", name, MAX_NAME_LENGTH)?;
    validate_coordinates(latitude, longitude)?;

    if !SAFE_ZONE_RADIUS_M.contains(&radius_m) {
        return Err(ValidationError::InvalidValue {
            field: "radius_m".to_string(),
            value: radius_m.to_string(),
        });
    }

    Ok(())
}
