//! User registration.

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::state::AuthState;
use super::storage::{SignupOutcome, insert_user};
use super::types::{AuthResponse, RegisterRequest, Role};
use super::utils::{hash_password, normalize_email};
use crate::api::handlers::{MessageResponse, internal_error, json_message};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered, session token issued", body = AuthResponse),
        (status = 400, description = "Missing fields or email already exists", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    tag = "auth"
)]
/// Create a user and issue a session token.
///
/// Duplicate emails are rejected with 400. The role is forced to `user`
/// unless the payload explicitly asks for `admin`; there is no authorization
/// check on who may request admin.
pub async fn register(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let Some(Json(payload)) = payload else {
        return json_message(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let name = payload.name.trim();
    let email = normalize_email(&payload.email);
    if name.is_empty() || email.is_empty() || payload.password.is_empty() {
        return json_message(
            StatusCode::BAD_REQUEST,
            "Name, email and password are required",
        );
    }

    let password_hash = match hash_password(
        payload.password.clone(),
        auth_state.config().bcrypt_cost(),
    )
    .await
    {
        Ok(hash) => hash,
        Err(err) => {
            error!("Register error: {err}");
            return internal_error();
        }
    };

    let role = match payload.role {
        Some(Role::Admin) => Role::Admin,
        _ => Role::User,
    };
    let timezone = payload
        .timezone
        .as_deref()
        .map(str::trim)
        .filter(|timezone| !timezone.is_empty())
        .unwrap_or_else(|| auth_state.config().default_timezone());

    let record = match insert_user(&pool, name, &email, &password_hash, timezone, role).await {
        Ok(SignupOutcome::Created(record)) => record,
        Ok(SignupOutcome::Conflict) => {
            return json_message(StatusCode::BAD_REQUEST, "Email already exists");
        }
        Err(err) => {
            error!("Register error: {err}");
            return internal_error();
        }
    };

    let token = match auth_state.keys().sign(
        record.id,
        &record.email,
        record.role,
        auth_state.config().token_ttl_seconds(),
    ) {
        Ok(token) => token,
        Err(err) => {
            error!("Register error: {err}");
            return internal_error();
        }
    };

    (
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: record.to_response(),
            token,
        }),
    )
        .into_response()
}
