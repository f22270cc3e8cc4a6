//! Event CRUD handlers.
//!
//! Same ownership model as timetables: every operation is scoped to the
//! caller's rows and a foreign, missing, or malformed id all answer `404`.
//! The parent timetable id is stored as given; it is not checked against the
//! timetables table, so events can outlive a deleted timetable.

mod storage;
pub mod types;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::auth::principal::Principal;
use super::{MessageResponse, internal_error, json_message};
use storage::{
    delete_event_record, fetch_event, fetch_events_for_user, insert_event, update_event_record,
};
use types::{
    CreateEventRequest, EventEnvelope, EventListResponse, ListEventsQuery, UpdateEventRequest,
};

const EVENT_NOT_FOUND: &str = "Event not found";
const DEFAULT_NOTIFY_BEFORE_MINUTES: i32 = 30;

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventEnvelope),
        (status = 400, description = "Invalid input", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    security(("bearer_token" = [])),
    tag = "events"
)]
pub async fn create_event(
    principal: Principal,
    pool: Extension<PgPool>,
    payload: Option<Json<CreateEventRequest>>,
) -> impl IntoResponse {
    let Some(Json(payload)) = payload else {
        return json_message(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let title = payload.title.trim();
    if title.is_empty() {
        return json_message(StatusCode::BAD_REQUEST, "Title is required");
    }

    match insert_event(
        &pool,
        principal.user_id,
        payload.timetable_id,
        title,
        payload.description.as_deref(),
        payload.location.as_deref(),
        payload.start_time,
        payload.end_time,
        &payload.repeat,
        payload
            .notify_before_minutes
            .unwrap_or(DEFAULT_NOTIFY_BEFORE_MINUTES),
    )
    .await
    {
        Ok(event) => (
            StatusCode::CREATED,
            Json(EventEnvelope {
                message: Some("Event created successfully".to_string()),
                data: event,
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Error creating event: {err}");
            internal_error()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/events",
    params(("timetableId" = Option<Uuid>, Query, description = "Restrict to one timetable")),
    responses(
        (status = 200, description = "Caller's events ordered by start time", body = EventListResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    security(("bearer_token" = [])),
    tag = "events"
)]
pub async fn list_events(
    principal: Principal,
    pool: Extension<PgPool>,
    Query(query): Query<ListEventsQuery>,
) -> impl IntoResponse {
    match fetch_events_for_user(&pool, principal.user_id, query.timetable_id).await {
        Ok(events) => (StatusCode::OK, Json(EventListResponse { data: events })).into_response(),
        Err(err) => {
            error!("Error fetching events: {err}");
            internal_error()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event detail", body = EventEnvelope),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 404, description = "Event not found", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    security(("bearer_token" = [])),
    tag = "events"
)]
pub async fn get_event(
    principal: Principal,
    Path(id): Path<String>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return json_message(StatusCode::NOT_FOUND, EVENT_NOT_FOUND);
    };

    match fetch_event(&pool, id, principal.user_id).await {
        Ok(Some(event)) => (
            StatusCode::OK,
            Json(EventEnvelope {
                message: None,
                data: event,
            }),
        )
            .into_response(),
        Ok(None) => json_message(StatusCode::NOT_FOUND, EVENT_NOT_FOUND),
        Err(err) => {
            error!("Error fetching event: {err}");
            internal_error()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    request_body = UpdateEventRequest,
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event updated", body = EventEnvelope),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 404, description = "Event not found", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    security(("bearer_token" = [])),
    tag = "events"
)]
pub async fn update_event(
    principal: Principal,
    Path(id): Path<String>,
    pool: Extension<PgPool>,
    payload: Option<Json<UpdateEventRequest>>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return json_message(StatusCode::NOT_FOUND, EVENT_NOT_FOUND);
    };

    let Some(Json(payload)) = payload else {
        return json_message(StatusCode::BAD_REQUEST, "Missing payload");
    };

    match update_event_record(
        &pool,
        id,
        principal.user_id,
        payload.timetable_id,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.location.as_deref(),
        payload.start_time,
        payload.end_time,
        payload.repeat.as_ref(),
        payload.notify_before_minutes,
    )
    .await
    {
        Ok(Some(event)) => (
            StatusCode::OK,
            Json(EventEnvelope {
                message: Some("Event updated successfully".to_string()),
                data: event,
            }),
        )
            .into_response(),
        Ok(None) => json_message(StatusCode::NOT_FOUND, EVENT_NOT_FOUND),
        Err(err) => {
            error!("Error updating event: {err}");
            internal_error()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = MessageResponse),
        (status = 404, description = "Event not found", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    security(("bearer_token" = [])),
    tag = "events"
)]
pub async fn delete_event(
    principal: Principal,
    Path(id): Path<String>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return json_message(StatusCode::NOT_FOUND, EVENT_NOT_FOUND);
    };

    match delete_event_record(&pool, id, principal.user_id).await {
        Ok(true) => json_message(StatusCode::OK, "Event deleted successfully"),
        Ok(false) => json_message(StatusCode::NOT_FOUND, EVENT_NOT_FOUND),
        Err(err) => {
            error!("Error deleting event: {err}");
            internal_error()
        }
    }
}
