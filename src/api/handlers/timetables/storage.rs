//! Owner-scoped timetable queries. Every read and write filters by both the
//! row id and the caller's user id, so a wrong owner and a missing row are
//! indistinguishable.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::Instrument;
use uuid::Uuid;

use super::types::TimetableResponse;

const INSERT_TIMETABLE_SQL: &str = r"
    INSERT INTO timetables (user_id, title, description, color_theme, start_date, end_date)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, user_id, title, description, color_theme, start_date, end_date,
              created_at, updated_at
";

const LIST_TIMETABLES_SQL: &str = r"
    SELECT id, user_id, title, description, color_theme, start_date, end_date,
           created_at, updated_at
    FROM timetables
    WHERE user_id = $1
    ORDER BY created_at DESC
";

const FETCH_TIMETABLE_SQL: &str = r"
    SELECT id, user_id, title, description, color_theme, start_date, end_date,
           created_at, updated_at
    FROM timetables
    WHERE id = $1 AND user_id = $2
";

const UPDATE_TIMETABLE_SQL: &str = r"
    UPDATE timetables
    SET title = COALESCE($3, title),
        description = COALESCE($4, description),
        color_theme = COALESCE($5, color_theme),
        start_date = COALESCE($6, start_date),
        end_date = COALESCE($7, end_date),
        updated_at = NOW()
    WHERE id = $1 AND user_id = $2
    RETURNING id, user_id, title, description, color_theme, start_date, end_date,
              created_at, updated_at
";

const DELETE_TIMETABLE_SQL: &str = "DELETE FROM timetables WHERE id = $1 AND user_id = $2";

fn row_to_timetable(row: &PgRow) -> TimetableResponse {
    TimetableResponse {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        color_theme: row.get("color_theme"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub(super) async fn insert_timetable(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    description: Option<&str>,
    color_theme: Option<&str>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> Result<TimetableResponse> {
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = INSERT_TIMETABLE_SQL
    );
    let row = sqlx::query(INSERT_TIMETABLE_SQL)
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(color_theme)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert timetable")?;

    Ok(row_to_timetable(&row))
}

/// Newest-first, matching how clients display the timetable list.
pub(super) async fn fetch_timetables_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<TimetableResponse>> {
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = LIST_TIMETABLES_SQL
    );
    let rows = sqlx::query(LIST_TIMETABLES_SQL)
        .bind(user_id)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list timetables")?;

    Ok(rows.iter().map(row_to_timetable).collect())
}

pub(super) async fn fetch_timetable(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<TimetableResponse>> {
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = FETCH_TIMETABLE_SQL
    );
    let row = sqlx::query(FETCH_TIMETABLE_SQL)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to fetch timetable")?;

    Ok(row.as_ref().map(row_to_timetable))
}

/// Partial update; a `NULL` bind keeps the stored value.
#[allow(clippy::too_many_arguments)]
pub(super) async fn update_timetable_record(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    color_theme: Option<&str>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
) -> Result<Option<TimetableResponse>> {
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = UPDATE_TIMETABLE_SQL
    );
    let row = sqlx::query(UPDATE_TIMETABLE_SQL)
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(color_theme)
        .bind(start_date)
        .bind(end_date)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to update timetable")?;

    Ok(row.as_ref().map(row_to_timetable))
}

/// Returns whether a row was deleted. Orphaned events are left in place.
pub(super) async fn delete_timetable_record(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<bool> {
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = DELETE_TIMETABLE_SQL
    );
    let result = sqlx::query(DELETE_TIMETABLE_SQL)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete timetable")?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_row_queries_filter_on_id_and_owner() {
        for sql in [FETCH_TIMETABLE_SQL, UPDATE_TIMETABLE_SQL, DELETE_TIMETABLE_SQL] {
            assert!(
                sql.contains("id = $1 AND user_id = $2"),
                "query lost its owner scope: {sql}"
            );
        }
    }

    #[test]
    fn list_is_owner_scoped_and_newest_first() {
        assert!(LIST_TIMETABLES_SQL.contains("WHERE user_id = $1"));
        assert!(LIST_TIMETABLES_SQL.contains("ORDER BY created_at DESC"));
    }

    #[test]
    fn update_keeps_absent_fields() {
        for column in ["title", "description", "color_theme", "start_date", "end_date"] {
            assert!(
                UPDATE_TIMETABLE_SQL.contains(&format!("{column} = COALESCE(")),
                "{column} is not a partial update"
            );
        }
    }
}
