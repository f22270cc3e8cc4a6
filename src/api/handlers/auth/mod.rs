//! Auth handlers and supporting modules.
//!
//! This module coordinates registration, login, session token verification,
//! OTP email verification, and the password reset flow.
//!
//! ## Session tokens
//!
//! A session token is a signed, time-bound JWT (HS256) carrying a typed,
//! versioned claims structure (`sub`, `email`, `role`, `iat`, `exp`, `ver`).
//! Tokens are valid for 7 days by default. Verification is stateless; there
//! is no server-side session store or revocation list.
//!
//! ## Password reset
//!
//! `forget-password` replaces the stored password immediately with a fresh
//! 6-digit value and emails it in cleartext, without any confirmation step.
//! Anyone who knows a victim's email can rotate their password. This is
//! preserved for compatibility with the existing clients; do not extend it.

pub mod claims;
pub mod login;
pub mod password;
pub mod principal;
pub mod register;
mod state;
mod storage;
pub mod types;
mod utils;
pub mod verification;

pub use state::{AuthConfig, AuthState};
