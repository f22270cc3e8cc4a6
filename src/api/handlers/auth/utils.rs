//! Small helpers for auth validation, OTP generation, and error matching.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Normalize an email for lookup/uniqueness checks.
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Generate a uniform random 6-digit numeric code.
///
/// Used for both OTP codes and replacement passwords.
pub(super) fn generate_numeric_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// An OTP is expired once the current time reaches `expires_at`.
pub(super) fn otp_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= expires_at
}

/// Hash a password off the async runtime; bcrypt at cost 10 is CPU-bound.
pub(super) async fn hash_password(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task failed")?
        .context("failed to hash password")
}

pub(super) async fn verify_password(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task failed")?
        .context("failed to verify password")
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn generated_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_numeric_code();
            assert_eq!(code.len(), 6);
            let value: u32 = code.parse().expect("numeric");
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn otp_expired_at_exact_boundary() {
        let now = Utc::now();
        assert!(otp_expired(now, now));
        assert!(otp_expired(now - Duration::seconds(1), now));
        assert!(!otp_expired(now + Duration::seconds(1), now));
    }

    #[tokio::test]
    async fn hash_and_verify_round_trip() {
        // Low cost keeps the test fast; production uses the configured cost.
        let hash = hash_password("pw1".to_string(), 4).await.expect("hash");
        assert!(verify_password("pw1".to_string(), hash.clone())
            .await
            .expect("verify"));
        assert!(!verify_password("pw2".to_string(), hash)
            .await
            .expect("verify"));
    }

    #[derive(Debug)]
    struct FakeDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "fake database error")
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &'static str {
            "fake database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(FakeDbError {
            code: Some("23505"),
        }));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(FakeDbError {
            code: Some("99999"),
        }));
        assert!(!is_unique_violation(&err));

        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
    }
}
