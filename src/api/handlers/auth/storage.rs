//! Database helpers for users and OTP verification state.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{Role, UserResponse};
use super::utils::is_unique_violation;

/// Outcome when attempting to create a new user.
#[derive(Debug)]
pub(super) enum SignupOutcome {
    Created(UserRecord),
    Conflict,
}

/// Full user row as stored; the password hash never leaves this module's
/// callers.
#[derive(Debug)]
pub(super) struct UserRecord {
    pub(super) id: Uuid,
    pub(super) name: String,
    pub(super) email: String,
    pub(super) password_hash: String,
    pub(super) timezone: String,
    pub(super) role: Role,
}

impl UserRecord {
    pub(super) fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            timezone: self.timezone.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug)]
pub(super) struct OtpRecord {
    pub(super) otp: String,
    pub(super) expires_at: DateTime<Utc>,
}

fn row_to_user(row: &PgRow) -> UserRecord {
    let role: String = row.get("role");
    UserRecord {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        timezone: row.get("timezone"),
        role: Role::from_db(&role),
    }
}

pub(super) async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
    let query = r"
        SELECT id, name, email, password_hash, timezone, role
        FROM users
        WHERE email = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by email")?;

    Ok(row.map(|row| row_to_user(&row)))
}

pub(super) async fn insert_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
    timezone: &str,
    role: Role,
) -> Result<SignupOutcome> {
    let query = r"
        INSERT INTO users (name, email, password_hash, timezone, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, password_hash, timezone, role
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(timezone)
        .bind(role.as_str())
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(SignupOutcome::Created(row_to_user(&row))),
        Err(err) if is_unique_violation(&err) => Ok(SignupOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}

pub(super) async fn update_password(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<()> {
    let query = r"
        UPDATE users
        SET password_hash = $2,
            updated_at = NOW()
        WHERE email = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(email)
        .bind(password_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to update password")?;
    Ok(())
}

pub(super) async fn mark_email_verified(pool: &PgPool, email: &str) -> Result<()> {
    let query = r"
        UPDATE users
        SET email_verified = TRUE,
            updated_at = NOW()
        WHERE email = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(email)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to mark email verified")?;
    Ok(())
}

/// Upsert the single live OTP row for an email, replacing any prior code.
pub(super) async fn upsert_otp(
    pool: &PgPool,
    email: &str,
    otp: &str,
    expires_at: DateTime<Utc>,
) -> Result<()> {
    let query = r"
        INSERT INTO otp_verifications (email, otp, expires_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE
        SET otp = EXCLUDED.otp,
            expires_at = EXCLUDED.expires_at
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(email)
        .bind(otp)
        .bind(expires_at)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to upsert OTP")?;
    Ok(())
}

pub(super) async fn find_otp(pool: &PgPool, email: &str) -> Result<Option<OtpRecord>> {
    let query = "SELECT otp, expires_at FROM otp_verifications WHERE email = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup OTP")?;

    Ok(row.map(|row| OtpRecord {
        otp: row.get("otp"),
        expires_at: row.get("expires_at"),
    }))
}

/// Consumption is a plain delete; the caller decides whether the code matched.
pub(super) async fn delete_otp(pool: &PgPool, email: &str) -> Result<()> {
    let query = "DELETE FROM otp_verifications WHERE email = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(email)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete OTP")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_outcome_debug_names() {
        assert_eq!(format!("{:?}", SignupOutcome::Conflict), "Conflict");
    }

    #[test]
    fn user_record_to_response_omits_password_hash() {
        let record = UserRecord {
            id: Uuid::nil(),
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$2b$10$hash".to_string(),
            timezone: "UTC".to_string(),
            role: Role::User,
        };
        let response = record.to_response();
        assert_eq!(response.id, Uuid::nil());
        assert_eq!(response.email, "a@x.com");
        let value = serde_json::to_value(&response).expect("serialize");
        assert!(value.get("password_hash").is_none());
        assert!(value.get("password").is_none());
    }
}
