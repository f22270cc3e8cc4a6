//! Wire types for event endpoints.
//!
//! The recurrence descriptor is stored and returned verbatim. Nothing here
//! expands occurrences or validates that `daysOfWeek` matches the repeat
//! kind; clients interpret the descriptor themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// How an event repeats. `daysOfWeek` is meaningful only for `weekly`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RepeatKind {
    #[default]
    None,
    Daily,
    Weekly,
}

impl RepeatKind {
    pub(super) fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// The column has a CHECK constraint; anything unexpected reads as `none`.
    pub(super) fn from_db(value: &str) -> Self {
        match value {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            _ => Self::None,
        }
    }
}

/// Unexpanded recurrence metadata: kind, weekday set (0 = Sunday through
/// 6 = Saturday), and an optional end of the repetition window.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RepeatDescriptor {
    #[serde(rename = "type", default)]
    pub kind: RepeatKind,
    #[serde(default)]
    pub days_of_week: Vec<i16>,
    pub until: Option<DateTime<Utc>>,
}

#[derive(ToSchema, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub timetable_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub repeat: RepeatDescriptor,
    pub notify_before_minutes: Option<i32>,
}

/// Partial update; absent fields keep their stored value. A present `repeat`
/// replaces the whole descriptor, not individual sub-fields.
#[derive(ToSchema, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub timetable_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub repeat: Option<RepeatDescriptor>,
    pub notify_before_minutes: Option<i32>,
}

#[derive(ToSchema, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsQuery {
    pub timetable_id: Option<Uuid>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub timetable_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub repeat: RepeatDescriptor,
    pub notify_before_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct EventEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: EventResponse,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct EventListResponse {
    pub data: Vec<EventResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_kind_round_trips_through_db_strings() {
        for kind in [RepeatKind::None, RepeatKind::Daily, RepeatKind::Weekly] {
            assert_eq!(RepeatKind::from_db(kind.as_str()), kind);
        }
        assert_eq!(RepeatKind::from_db("fortnightly"), RepeatKind::None);
    }

    #[test]
    fn repeat_descriptor_uses_type_key() {
        let descriptor: RepeatDescriptor = serde_json::from_value(serde_json::json!({
            "type": "weekly",
            "daysOfWeek": [1, 3, 5],
            "until": "2026-06-01T00:00:00Z"
        }))
        .expect("deserialize");
        assert_eq!(descriptor.kind, RepeatKind::Weekly);
        assert_eq!(descriptor.days_of_week, vec![1, 3, 5]);
        assert!(descriptor.until.is_some());

        let value = serde_json::to_value(&descriptor).expect("serialize");
        assert_eq!(value.get("type"), Some(&serde_json::json!("weekly")));
        assert!(value.get("daysOfWeek").is_some());
    }

    #[test]
    fn repeat_defaults_to_none_when_absent() {
        let request: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "timetableId": Uuid::nil(),
            "title": "Standup",
            "startTime": "2026-01-05T09:00:00Z",
            "endTime": "2026-01-05T09:15:00Z"
        }))
        .expect("deserialize");
        assert_eq!(request.repeat.kind, RepeatKind::None);
        assert!(request.repeat.days_of_week.is_empty());
        assert!(request.repeat.until.is_none());
        assert!(request.notify_before_minutes.is_none());
    }

    #[test]
    fn empty_descriptor_deserializes() {
        let descriptor: RepeatDescriptor =
            serde_json::from_value(serde_json::json!({})).expect("deserialize");
        assert_eq!(descriptor.kind, RepeatKind::None);
    }
}
