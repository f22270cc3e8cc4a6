//! Owner-scoped event queries. The recurrence descriptor lives in three
//! columns and is replaced as a unit on update.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{EventResponse, RepeatDescriptor, RepeatKind};

const INSERT_EVENT_SQL: &str = r"
    INSERT INTO events (user_id, timetable_id, title, description, location,
                        start_time, end_time, repeat_kind, repeat_days_of_week,
                        repeat_until, notify_before_minutes)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
    RETURNING id, user_id, timetable_id, title, description, location,
              start_time, end_time, repeat_kind, repeat_days_of_week, repeat_until,
              notify_before_minutes, created_at, updated_at
";

const LIST_EVENTS_SQL: &str = r"
    SELECT id, user_id, timetable_id, title, description, location,
           start_time, end_time, repeat_kind, repeat_days_of_week, repeat_until,
           notify_before_minutes, created_at, updated_at
    FROM events
    WHERE user_id = $1
      AND ($2::uuid IS NULL OR timetable_id = $2)
    ORDER BY start_time ASC
";

const FETCH_EVENT_SQL: &str = r"
    SELECT id, user_id, timetable_id, title, description, location,
           start_time, end_time, repeat_kind, repeat_days_of_week, repeat_until,
           notify_before_minutes, created_at, updated_at
    FROM events
    WHERE id = $1 AND user_id = $2
";

// Scalar fields use COALESCE; the three repeat columns are replaced together
// when a descriptor is supplied ($9 is the switch).
const UPDATE_EVENT_SQL: &str = r"
    UPDATE events
    SET timetable_id = COALESCE($3, timetable_id),
        title = COALESCE($4, title),
        description = COALESCE($5, description),
        location = COALESCE($6, location),
        start_time = COALESCE($7, start_time),
        end_time = COALESCE($8, end_time),
        repeat_kind = CASE WHEN $9 THEN $10 ELSE repeat_kind END,
        repeat_days_of_week = CASE WHEN $9 THEN $11 ELSE repeat_days_of_week END,
        repeat_until = CASE WHEN $9 THEN $12 ELSE repeat_until END,
        notify_before_minutes = COALESCE($13, notify_before_minutes),
        updated_at = NOW()
    WHERE id = $1 AND user_id = $2
    RETURNING id, user_id, timetable_id, title, description, location,
              start_time, end_time, repeat_kind, repeat_days_of_week, repeat_until,
              notify_before_minutes, created_at, updated_at
";

const DELETE_EVENT_SQL: &str = "DELETE FROM events WHERE id = $1 AND user_id = $2";

fn row_to_event(row: &PgRow) -> EventResponse {
    let repeat_kind: String = row.get("repeat_kind");
    EventResponse {
        id: row.get("id"),
        user_id: row.get("user_id"),
        timetable_id: row.get("timetable_id"),
        title: row.get("title"),
        description: row.get("description"),
        location: row.get("location"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        repeat: RepeatDescriptor {
            kind: RepeatKind::from_db(&repeat_kind),
            days_of_week: row.get("repeat_days_of_week"),
            until: row.get("repeat_until"),
        },
        notify_before_minutes: row.get("notify_before_minutes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[allow(clippy::too_many_arguments)]
pub(super) async fn insert_event(
    pool: &PgPool,
    user_id: Uuid,
    timetable_id: Uuid,
    title: &str,
    description: Option<&str>,
    location: Option<&str>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    repeat: &RepeatDescriptor,
    notify_before_minutes: i32,
) -> Result<EventResponse> {
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = INSERT_EVENT_SQL
    );
    let row = sqlx::query(INSERT_EVENT_SQL)
        .bind(user_id)
        .bind(timetable_id)
        .bind(title)
        .bind(description)
        .bind(location)
        .bind(start_time)
        .bind(end_time)
        .bind(repeat.kind.as_str())
        .bind(&repeat.days_of_week)
        .bind(repeat.until)
        .bind(notify_before_minutes)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert event")?;

    Ok(row_to_event(&row))
}

/// Soonest-first; an optional timetable id narrows the list to one parent.
pub(super) async fn fetch_events_for_user(
    pool: &PgPool,
    user_id: Uuid,
    timetable_id: Option<Uuid>,
) -> Result<Vec<EventResponse>> {
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = LIST_EVENTS_SQL
    );
    let rows = sqlx::query(LIST_EVENTS_SQL)
        .bind(user_id)
        .bind(timetable_id)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list events")?;

    Ok(rows.iter().map(row_to_event).collect())
}

pub(super) async fn fetch_event(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<EventResponse>> {
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = FETCH_EVENT_SQL
    );
    let row = sqlx::query(FETCH_EVENT_SQL)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch event")?;

    Ok(row.as_ref().map(row_to_event))
}

#[allow(clippy::too_many_arguments)]
pub(super) async fn update_event_record(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    timetable_id: Option<Uuid>,
    title: Option<&str>,
    description: Option<&str>,
    location: Option<&str>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    repeat: Option<&RepeatDescriptor>,
    notify_before_minutes: Option<i32>,
) -> Result<Option<EventResponse>> {
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = UPDATE_EVENT_SQL
    );
    let days_of_week = repeat
        .map(|repeat| repeat.days_of_week.clone())
        .unwrap_or_default();
    let row = sqlx::query(UPDATE_EVENT_SQL)
        .bind(id)
        .bind(user_id)
        .bind(timetable_id)
        .bind(title)
        .bind(description)
        .bind(location)
        .bind(start_time)
        .bind(end_time)
        .bind(repeat.is_some())
        .bind(repeat.map(|repeat| repeat.kind.as_str()))
        .bind(days_of_week)
        .bind(repeat.and_then(|repeat| repeat.until))
        .bind(notify_before_minutes)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to update event")?;

    Ok(row.as_ref().map(row_to_event))
}

pub(super) async fn delete_event_record(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = DELETE_EVENT_SQL
    );
    let result = sqlx::query(DELETE_EVENT_SQL)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete event")?;

    Ok(result.rows_affected() > 0)
}
