//! Request handlers, one module per entity.

pub mod auth;
pub mod events;
pub mod health;
pub mod timetables;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform JSON body for messages and errors.
///
/// Every error response carries a human-readable `message`; no structured
/// error codes are exposed to clients.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            info: None,
        }
    }

    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }
}

/// Respond with a status code and a JSON `{"message": ...}` body.
pub(crate) fn json_message(status: StatusCode, message: &str) -> Response {
    (status, Json(MessageResponse::new(message))).into_response()
}

/// Generic 500 body; details are logged server-side by the caller.
pub(crate) fn internal_error() -> Response {
    json_message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

// Undocumented root route, wired outside the OpenAPI router.
pub async fn root() -> &'static str {
    "Welcome to the Tempora API"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_response_skips_absent_info() {
        let value = serde_json::to_value(MessageResponse::new("done")).expect("serialize");
        assert_eq!(value, serde_json::json!({"message": "done"}));
    }

    #[test]
    fn message_response_includes_info_when_set() {
        let value = serde_json::to_value(
            MessageResponse::new("sent").with_info("Please check your email"),
        )
        .expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"message": "sent", "info": "Please check your email"})
        );
    }

    #[tokio::test]
    async fn root_returns_welcome() {
        assert_eq!(root().await, "Welcome to the Tempora API");
    }
}
