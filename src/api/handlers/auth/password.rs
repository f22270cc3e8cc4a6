//! Password recovery.

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info};

use super::state::AuthState;
use super::storage::{find_user_by_email, update_password};
use super::types::ForgetPasswordRequest;
use super::utils::{generate_numeric_code, hash_password, normalize_email};
use crate::api::email::{Mailer, new_password_email_html};
use crate::api::handlers::{MessageResponse, internal_error, json_message};

#[utoipa::path(
    post,
    path = "/api/auth/forget-password",
    request_body = ForgetPasswordRequest,
    responses(
        (status = 200, description = "Replacement password emailed", body = MessageResponse),
        (status = 400, description = "Email is required", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 500, description = "Internal error", body = MessageResponse)
    ),
    tag = "auth"
)]
/// Replace the account password with a random 6-digit one and email it.
///
/// The old password is overwritten before the email is sent, so anyone who
/// knows an account's email can lock its owner out until they read the new
/// password from their inbox. The 404 for unknown addresses also makes this
/// endpoint an account-existence oracle.
pub async fn forget_password(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    mailer: Extension<Arc<dyn Mailer>>,
    payload: Option<Json<ForgetPasswordRequest>>,
) -> impl IntoResponse {
    let Some(Json(payload)) = payload else {
        return json_message(StatusCode::BAD_REQUEST, "Email is required");
    };

    let email = normalize_email(&payload.email);
    if email.is_empty() {
        return json_message(StatusCode::BAD_REQUEST, "Email is required");
    }

    match find_user_by_email(&pool, &email).await {
        Ok(Some(_)) => {}
        Ok(None) => return json_message(StatusCode::NOT_FOUND, "User not found"),
        Err(err) => {
            error!("Forget password error: {err}");
            return internal_error();
        }
    }

    let new_password = generate_numeric_code();
    info!("Generated new password for {email}: {new_password}");

    let password_hash =
        match hash_password(new_password.clone(), auth_state.config().bcrypt_cost()).await {
            Ok(hash) => hash,
            Err(err) => {
                error!("Forget password error: {err}");
                return internal_error();
            }
        };

    if let Err(err) = update_password(&pool, &email, &password_hash).await {
        error!("Forget password error: {err}");
        return internal_error();
    }

    let body = new_password_email_html(&new_password);
    if let Err(err) = mailer.send(&email, "Tempora - Your new password", &body).await {
        error!("Forget password error: {err}");
        return internal_error();
    }

    (
        StatusCode::OK,
        Json(
            MessageResponse::new("New password sent to your email successfully")
                .with_info("Please check your email for the new password"),
        ),
    )
        .into_response()
}
