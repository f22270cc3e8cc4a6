//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User role. Defaults to `user`; `admin` is only set when explicitly
/// requested at registration.
#[derive(ToSchema, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Canonical string stored in the `users.role` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Parse the database representation; unknown values fall back to `user`.
    #[must_use]
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub timezone: Option<String>,
    pub role: Option<Role>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub timezone: String,
    pub role: Role,
}

/// Body for successful register/login: the user plus a signed session token.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
    pub token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SendVerificationRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ForgetPasswordRequest {
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_lowercase() {
        let value = serde_json::to_value(Role::Admin).expect("serialize");
        assert_eq!(value, serde_json::json!("admin"));
        let role: Role = serde_json::from_value(serde_json::json!("user")).expect("deserialize");
        assert_eq!(role, Role::User);
    }

    #[test]
    fn role_from_db_defaults_to_user() {
        assert_eq!(Role::from_db("admin"), Role::Admin);
        assert_eq!(Role::from_db("user"), Role::User);
        assert_eq!(Role::from_db("superuser"), Role::User);
    }

    #[test]
    fn register_request_role_is_optional() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Alice",
            "email": "a@x.com",
            "password": "pw1"
        }))
        .expect("deserialize");
        assert!(request.role.is_none());
        assert!(request.timezone.is_none());
    }

    #[test]
    fn auth_response_shape() {
        let response = AuthResponse {
            message: "Login successfully".to_string(),
            user: UserResponse {
                id: Uuid::nil(),
                name: "Alice".to_string(),
                email: "a@x.com".to_string(),
                timezone: "Asia/Ho_Chi_Minh".to_string(),
                role: Role::User,
            },
            token: "token".to_string(),
        };
        let value = serde_json::to_value(&response).expect("serialize");
        assert_eq!(value["user"]["role"], "user");
        assert_eq!(value["token"], "token");
    }
}
