//! Authenticated principal extraction.
//!
//! Protected routes read the `Authorization: Bearer <token>` header, verify
//! the signed claims, and hand downstream handlers a principal. All timetable
//! and event authorization is then enforced by owner-scoped storage queries,
//! not here.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts};
use axum::response::Response;
use std::sync::Arc;
use uuid::Uuid;

use super::state::AuthState;
use super::types::Role;
use crate::api::handlers::{internal_error, json_message};

/// Authenticated user context derived from the bearer token.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Resolve the bearer token into a principal, or return a 401 response.
///
/// A missing or malformed header and an invalid or expired token are reported
/// with distinct messages but the same status.
///
/// # Errors
/// Returns a ready-to-send 401 response when authentication fails.
pub fn require_auth(headers: &HeaderMap, state: &AuthState) -> Result<Principal, Response> {
    let Some(token) = extract_bearer_token(headers) else {
        return Err(json_message(
            StatusCode::UNAUTHORIZED,
            "Authorization header is missing or invalid",
        ));
    };

    match state.keys().verify(&token) {
        Ok(claims) => Ok(Principal {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }),
        Err(_) => Err(json_message(StatusCode::UNAUTHORIZED, "Invalid token")),
    }
}

/// Extractor form of [`require_auth`].
///
/// Listed first in protected handlers so the auth check runs before path and
/// body extraction: an unauthenticated request answers 401 even when its id
/// or JSON payload is malformed.
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(auth_state) = parts.extensions.get::<Arc<AuthState>>() else {
            return Err(internal_error());
        };
        require_auth(&parts.headers, auth_state)
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::{AuthConfig, claims::TokenKeys};
    use axum::http::HeaderValue;

    fn state() -> AuthState {
        AuthState::new(AuthConfig::new(), TokenKeys::from_secret(b"test-secret"))
    }

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).expect("header"),
        );
        headers
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let result = require_auth(&HeaderMap::new(), &state());
        let response = result.err().expect("401");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn non_bearer_header_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(require_auth(&headers, &state()).is_err());
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        let headers = bearer_headers("not-a-token");
        let response = require_auth(&headers, &state()).err().expect("401");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn valid_token_yields_principal() {
        let state = state();
        let user_id = Uuid::new_v4();
        let token = state
            .keys()
            .sign(user_id, "alice@example.com", Role::Admin, 3600)
            .expect("sign");

        let principal = require_auth(&bearer_headers(&token), &state).expect("principal");
        assert_eq!(principal.user_id, user_id);
        assert_eq!(principal.email, "alice@example.com");
        assert_eq!(principal.role, Role::Admin);
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let state = state();
        let token = state
            .keys()
            .sign(Uuid::new_v4(), "alice@example.com", Role::User, -10)
            .expect("sign");
        assert!(require_auth(&bearer_headers(&token), &state).is_err());
    }

    #[test]
    fn extract_bearer_token_trims_and_rejects_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc "));
        assert_eq!(extract_bearer_token(&headers), Some("abc".to_string()));
    }
}
