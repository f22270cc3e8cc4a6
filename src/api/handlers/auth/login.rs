//! Login with email and password.

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
use super::storage::find_user_by_email;
use super::types::{AuthResponse, LoginRequest};
use super::utils::{normalize_email, verify_password};
use crate::api::handlers::{MessageResponse, internal_error, json_message};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = AuthResponse),
        (status = 400, description = "Invalid credentials", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    tag = "auth"
)]
/// Verify credentials and issue a session token.
///
/// Unknown email and wrong password return the identical response, so a
/// caller cannot probe which addresses have accounts.
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let Some(Json(payload)) = payload else {
        return json_message(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let email = normalize_email(&payload.email);

    let record = match find_user_by_email(&pool, &email).await {
        Ok(Some(record)) => record,
        Ok(None) => return json_message(StatusCode::BAD_REQUEST, INVALID_CREDENTIALS),
        Err(err) => {
            error!("Login error: {err}");
            return internal_error();
        }
    };

    match verify_password(payload.password.clone(), record.password_hash.clone()).await {
        Ok(true) => {}
        Ok(false) => return json_message(StatusCode::BAD_REQUEST, INVALID_CREDENTIALS),
        Err(err) => {
            error!("Login error: {err}");
            return internal_error();
        }
    }

    let token = match auth_state.keys().sign(
        record.id,
        &record.email,
        record.role,
        auth_state.config().token_ttl_seconds(),
    ) {
        Ok(token) => token,
        Err(err) => {
            error!("Login error: {err}");
            return internal_error();
        }
    };

    (
        StatusCode::OK,
        Json(AuthResponse {
            message: "Login successfully".to_string(),
            user: record.to_response(),
            token,
        }),
    )
        .into_response()
}
