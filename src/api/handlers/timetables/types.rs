//! Wire types for timetable endpoints. Bodies use camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimetableRequest {
    pub title: String,
    pub description: Option<String>,
    pub color_theme: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Partial update; absent fields keep their stored value.
#[derive(ToSchema, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimetableRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color_theme: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TimetableResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub color_theme: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `{message?, data}` envelope for single-timetable responses.
#[derive(ToSchema, Serialize, Debug)]
pub struct TimetableEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: TimetableResponse,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct TimetableListResponse {
    pub data: Vec<TimetableResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_uses_camel_case() {
        let payload = serde_json::json!({
            "title": "Semester 1",
            "colorTheme": "indigo",
            "startDate": "2026-01-05T00:00:00Z",
            "endDate": "2026-05-29T00:00:00Z"
        });
        let request: CreateTimetableRequest =
            serde_json::from_value(payload).expect("deserialize");
        assert_eq!(request.title, "Semester 1");
        assert_eq!(request.color_theme.as_deref(), Some("indigo"));
        assert!(request.description.is_none());
    }

    #[test]
    fn response_serializes_camel_case() {
        let response = TimetableResponse {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            title: "Semester 1".to_string(),
            description: None,
            color_theme: None,
            start_date: Utc::now(),
            end_date: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&response).expect("serialize");
        assert!(value.get("userId").is_some());
        assert!(value.get("startDate").is_some());
        assert!(value.get("user_id").is_none());
    }

    #[test]
    fn envelope_skips_absent_message() {
        let envelope = TimetableEnvelope {
            message: None,
            data: TimetableResponse {
                id: Uuid::nil(),
                user_id: Uuid::nil(),
                title: "t".to_string(),
                description: None,
                color_theme: None,
                start_date: Utc::now(),
                end_date: Utc::now(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        };
        let value = serde_json::to_value(&envelope).expect("serialize");
        assert!(value.get("message").is_none());
        assert!(value.get("data").is_some());
    }
}
