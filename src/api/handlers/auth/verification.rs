//! Email verification with short-lived one-time codes.

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info};

use super::state::AuthState;
use super::storage::{OtpRecord, delete_otp, find_otp, mark_email_verified, upsert_otp};
use super::types::{SendVerificationRequest, VerifyOtpRequest};
use super::utils::{generate_numeric_code, normalize_email, otp_expired};
use crate::api::email::{Mailer, otp_email_html};
use crate::api::handlers::{MessageResponse, internal_error, json_message};

/// Outcome of checking a submitted code against the stored record.
///
/// The code match is checked before expiry, so a wrong code on an expired
/// entry reports a mismatch. An expired record is left in place; it keeps
/// answering `Expired` until a new code replaces it.
#[derive(Debug, PartialEq, Eq)]
enum OtpCheck {
    Missing,
    Mismatch,
    Expired,
    Valid,
}

fn check_otp(record: Option<&OtpRecord>, submitted: &str, now: DateTime<Utc>) -> OtpCheck {
    let Some(record) = record else {
        return OtpCheck::Missing;
    };
    if record.otp != submitted {
        return OtpCheck::Mismatch;
    }
    if otp_expired(record.expires_at, now) {
        return OtpCheck::Expired;
    }
    OtpCheck::Valid
}

#[utoipa::path(
    post,
    path = "/api/auth/send-verification",
    request_body = SendVerificationRequest,
    responses(
        (status = 200, description = "OTP generated and emailed", body = MessageResponse),
        (status = 400, description = "Email is required", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    tag = "auth"
)]
/// Generate a 6-digit code, store it with a short expiry, and email it.
///
/// Re-sending replaces any previous code for the address; only the latest
/// code is ever valid.
pub async fn send_verification(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    mailer: Extension<Arc<dyn Mailer>>,
    payload: Option<Json<SendVerificationRequest>>,
) -> impl IntoResponse {
    let Some(Json(payload)) = payload else {
        return json_message(StatusCode::BAD_REQUEST, "Email is required");
    };

    let email = normalize_email(&payload.email);
    if email.is_empty() {
        return json_message(StatusCode::BAD_REQUEST, "Email is required");
    }

    let otp = generate_numeric_code();
    let ttl_seconds = auth_state.config().otp_ttl_seconds();
    let expires_at = Utc::now() + Duration::seconds(ttl_seconds);

    info!("Generated OTP for {email}: {otp}");

    if let Err(err) = upsert_otp(&pool, &email, &otp, expires_at).await {
        error!("Send verification error: {err}");
        return internal_error();
    }

    let subject = format!("Tempora verification code - {otp}");
    let body = otp_email_html(&otp, ttl_seconds);
    if let Err(err) = mailer.send(&email, &subject, &body).await {
        error!("Send verification error: {err}");
        return internal_error();
    }

    json_message(StatusCode::OK, "OTP sent successfully")
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Missing fields, wrong or expired OTP", body = MessageResponse),
        (status = 404, description = "No OTP pending for this email", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    tag = "auth"
)]
/// Check a submitted code against the stored one and mark the email verified.
///
/// Only a valid code is consumed; see [`OtpCheck`] for the branch ordering.
pub async fn verify_otp(
    pool: Extension<PgPool>,
    payload: Option<Json<VerifyOtpRequest>>,
) -> impl IntoResponse {
    let Some(Json(payload)) = payload else {
        return json_message(StatusCode::BAD_REQUEST, "Email and OTP are required");
    };

    let email = normalize_email(&payload.email);
    let otp = payload.otp.trim();
    if email.is_empty() || otp.is_empty() {
        return json_message(StatusCode::BAD_REQUEST, "Email and OTP are required");
    }

    let record = match find_otp(&pool, &email).await {
        Ok(record) => record,
        Err(err) => {
            error!("Verify OTP error: {err}");
            return internal_error();
        }
    };

    match check_otp(record.as_ref(), otp, Utc::now()) {
        OtpCheck::Missing => json_message(StatusCode::NOT_FOUND, "No OTP found for this email"),
        OtpCheck::Mismatch => json_message(StatusCode::BAD_REQUEST, "Invalid OTP"),
        OtpCheck::Expired => json_message(StatusCode::BAD_REQUEST, "OTP has expired"),
        OtpCheck::Valid => {
            if let Err(err) = delete_otp(&pool, &email).await {
                error!("Verify OTP error: {err}");
                return internal_error();
            }
            if let Err(err) = mark_email_verified(&pool, &email).await {
                error!("Verify OTP error: {err}");
                return internal_error();
            }
            json_message(StatusCode::OK, "Email verified successfully")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(otp: &str, expires_in_seconds: i64) -> OtpRecord {
        OtpRecord {
            otp: otp.to_string(),
            expires_at: Utc::now() + Duration::seconds(expires_in_seconds),
        }
    }

    #[test]
    fn missing_record_wins_over_everything() {
        assert_eq!(check_otp(None, "123456", Utc::now()), OtpCheck::Missing);
    }

    #[test]
    fn mismatch_is_reported_before_expiry() {
        // Wrong code on an already-expired record still reads as a mismatch.
        let stored = record("123456", -30);
        assert_eq!(
            check_otp(Some(&stored), "654321", Utc::now()),
            OtpCheck::Mismatch
        );
    }

    #[test]
    fn matching_expired_code_is_expired_not_valid() {
        let stored = record("123456", -30);
        assert_eq!(
            check_otp(Some(&stored), "123456", Utc::now()),
            OtpCheck::Expired
        );
    }

    #[test]
    fn expired_check_does_not_consume_the_record() {
        // The record is untouched by the check itself, so a second
        // presentation of the same expired code reads Expired again rather
        // than Missing.
        let stored = record("123456", -30);
        let now = Utc::now();
        assert_eq!(check_otp(Some(&stored), "123456", now), OtpCheck::Expired);
        assert_eq!(check_otp(Some(&stored), "123456", now), OtpCheck::Expired);
    }

    #[test]
    fn matching_live_code_is_valid() {
        let stored = record("123456", 60);
        assert_eq!(
            check_otp(Some(&stored), "123456", Utc::now()),
            OtpCheck::Valid
        );
    }

    #[test]
    fn code_at_exact_expiry_is_expired() {
        let now = Utc::now();
        let stored = OtpRecord {
            otp: "123456".to_string(),
            expires_at: now,
        };
        assert_eq!(check_otp(Some(&stored), "123456", now), OtpCheck::Expired);
    }
}
