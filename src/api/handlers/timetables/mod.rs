//! Timetable CRUD handlers.
//!
//! All routes require a bearer token and operate only on rows owned by the
//! caller. A timetable that exists but belongs to someone else returns `404`,
//! indistinguishable from an id that never existed. Ids that are not valid
//! UUIDs take the same `404` path, since no row can match them.

mod storage;
pub mod types;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::auth::principal::Principal;
use super::{MessageResponse, internal_error, json_message};
use storage::{
    delete_timetable_record, fetch_timetable, fetch_timetables_for_user, insert_timetable,
    update_timetable_record,
};
use types::{
    CreateTimetableRequest, TimetableEnvelope, TimetableListResponse, UpdateTimetableRequest,
};

const TIMETABLE_NOT_FOUND: &str = "Timetable not found";

#[utoipa::path(
    post,
    path = "/api/timetables",
    request_body = CreateTimetableRequest,
    responses(
        (status = 201, description = "Timetable created", body = TimetableEnvelope),
        (status = 400, description = "Invalid input", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    security(("bearer_token" = [])),
    tag = "timetables"
)]
pub async fn create_timetable(
    principal: Principal,
    pool: Extension<PgPool>,
    payload: Option<Json<CreateTimetableRequest>>,
) -> impl IntoResponse {
    let Some(Json(payload)) = payload else {
        return json_message(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let title = payload.title.trim();
    if title.is_empty() {
        return json_message(StatusCode::BAD_REQUEST, "Title is required");
    }

    match insert_timetable(
        &pool,
        principal.user_id,
        title,
        payload.description.as_deref(),
        payload.color_theme.as_deref(),
        payload.start_date,
        payload.end_date,
    )
    .await
    {
        Ok(timetable) => (
            StatusCode::CREATED,
            Json(TimetableEnvelope {
                message: Some("Timetable created successfully".to_string()),
                data: timetable,
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Error creating timetable: {err}");
            internal_error()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/timetables",
    responses(
        (status = 200, description = "Caller's timetables, newest first", body = TimetableListResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    security(("bearer_token" = [])),
    tag = "timetables"
)]
pub async fn list_timetables(principal: Principal, pool: Extension<PgPool>) -> impl IntoResponse {
    match fetch_timetables_for_user(&pool, principal.user_id).await {
        Ok(timetables) => (
            StatusCode::OK,
            Json(TimetableListResponse { data: timetables }),
        )
            .into_response(),
        Err(err) => {
            error!("Error fetching timetables: {err}");
            internal_error()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/timetables/{id}",
    params(("id" = Uuid, Path, description = "Timetable id")),
    responses(
        (status = 200, description = "Timetable detail", body = TimetableEnvelope),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 404, description = "Timetable not found", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    security(("bearer_token" = [])),
    tag = "timetables"
)]
pub async fn get_timetable(
    principal: Principal,
    Path(id): Path<String>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return json_message(StatusCode::NOT_FOUND, TIMETABLE_NOT_FOUND);
    };

    match fetch_timetable(&pool, id, principal.user_id).await {
        Ok(Some(timetable)) => (
            StatusCode::OK,
            Json(TimetableEnvelope {
                message: None,
                data: timetable,
            }),
        )
            .into_response(),
        Ok(None) => json_message(StatusCode::NOT_FOUND, TIMETABLE_NOT_FOUND),
        Err(err) => {
            error!("Error fetching timetable: {err}");
            internal_error()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/timetables/{id}",
    request_body = UpdateTimetableRequest,
    params(("id" = Uuid, Path, description = "Timetable id")),
    responses(
        (status = 200, description = "Timetable updated", body = TimetableEnvelope),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 404, description = "Timetable not found", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    security(("bearer_token" = [])),
    tag = "timetables"
)]
pub async fn update_timetable(
    principal: Principal,
    Path(id): Path<String>,
    pool: Extension<PgPool>,
    payload: Option<Json<UpdateTimetableRequest>>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return json_message(StatusCode::NOT_FOUND, TIMETABLE_NOT_FOUND);
    };

    let Some(Json(payload)) = payload else {
        return json_message(StatusCode::BAD_REQUEST, "Missing payload");
    };

    match update_timetable_record(
        &pool,
        id,
        principal.user_id,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.color_theme.as_deref(),
        payload.start_date,
        payload.end_date,
    )
    .await
    {
        Ok(Some(timetable)) => (
            StatusCode::OK,
            Json(TimetableEnvelope {
                message: Some("Timetable updated successfully".to_string()),
                data: timetable,
            }),
        )
            .into_response(),
        Ok(None) => json_message(StatusCode::NOT_FOUND, TIMETABLE_NOT_FOUND),
        Err(err) => {
            error!("Error updating timetable: {err}");
            internal_error()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/timetables/{id}",
    params(("id" = Uuid, Path, description = "Timetable id")),
    responses(
        (status = 200, description = "Timetable deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 404, description = "Timetable not found", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    security(("bearer_token" = [])),
    tag = "timetables"
)]
/// Deleting a timetable does not cascade to its events; they remain reachable
/// through the events endpoints.
pub async fn delete_timetable(
    principal: Principal,
    Path(id): Path<String>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return json_message(StatusCode::NOT_FOUND, TIMETABLE_NOT_FOUND);
    };

    match delete_timetable_record(&pool, id, principal.user_id).await {
        Ok(true) => json_message(StatusCode::OK, "Timetable deleted successfully"),
        Ok(false) => json_message(StatusCode::NOT_FOUND, TIMETABLE_NOT_FOUND),
        Err(err) => {
            error!("Error deleting timetable: {err}");
            internal_error()
        }
    }
}
