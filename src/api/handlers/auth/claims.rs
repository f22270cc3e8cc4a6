//! Signed session token claims.
//!
//! The token is a time-bound capsule of `{sub, email, role}` signed with
//! HS256. Claims are typed and versioned; decoded tokens with an unexpected
//! `ver` are rejected rather than trusted field-by-field.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::Role;

pub const CLAIMS_VERSION: u8 = 1;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub ver: u8,
}

/// Signing and verification keys derived from the shared secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    #[must_use]
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock leeway; verify() handles the exact-instant boundary.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for the given identity with the configured validity window.
    ///
    /// # Errors
    /// Returns an error if signing fails.
    pub fn sign(&self, user_id: Uuid, email: &str, role: Role, ttl_seconds: i64) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: now,
            exp: now + ttl_seconds,
            ver: CLAIMS_VERSION,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .context("failed to sign session token")
    }

    /// Verify signature and expiry, returning the decoded claims.
    ///
    /// # Errors
    /// Returns an error for a bad signature, an expired token, or an
    /// unsupported claims version.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .context("invalid session token")?;
        // The library only rejects exp < now; a token issued at T must be
        // rejected from exactly T + ttl onwards.
        if data.claims.exp <= Utc::now().timestamp() {
            bail!("session token expired");
        }
        if data.claims.ver != CLAIMS_VERSION {
            bail!("unsupported claims version: {}", data.claims.ver);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::from_secret(b"test-secret")
    }

    #[test]
    fn sign_verify_round_trip() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = keys
            .sign(user_id, "alice@example.com", Role::User, 3600)
            .expect("sign");

        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.ver, CLAIMS_VERSION);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys();
        let token = keys
            .sign(Uuid::new_v4(), "alice@example.com", Role::User, -10)
            .expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn token_is_rejected_at_exact_expiry_instant() {
        // ttl 0 puts exp at the issuance timestamp, so the first verification
        // already sits on the boundary.
        let keys = keys();
        let token = keys
            .sign(Uuid::new_v4(), "alice@example.com", Role::User, 0)
            .expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let keys = keys();
        let token = keys
            .sign(Uuid::new_v4(), "alice@example.com", Role::User, 3600)
            .expect("sign");
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(keys.verify(&tampered).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = keys()
            .sign(Uuid::new_v4(), "alice@example.com", Role::Admin, 3600)
            .expect("sign");
        let other = TokenKeys::from_secret(b"other-secret");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn unsupported_claims_version_is_rejected() {
        let keys = keys();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            role: Role::User,
            iat: now,
            exp: now + 3600,
            ver: CLAIMS_VERSION + 1,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("encode");
        assert!(keys.verify(&token).is_err());
    }
}
