//! # Tempora (Scheduling & Calendar API)
//!
//! `tempora` is an HTTP JSON backend for named timetables containing events
//! with optional recurrence descriptors and reminder offsets.
//!
//! ## Ownership model
//!
//! Every timetable and event belongs to exactly one user. Reads and writes on
//! `/api/timetables` and `/api/events` are filtered by `(id, user_id)`, so a
//! resource owned by another user is indistinguishable from a nonexistent one:
//! both return `404 Not Found`. This prevents resource enumeration across
//! accounts.
//!
//! ## Authentication
//!
//! Sessions are bearer JWTs signed with HS256 carrying a typed, versioned
//! claims structure (`sub`, `email`, `role`, `iat`, `exp`, `ver`) with a
//! 7-day validity window. Email ownership is verified through a short-lived
//! 6-digit OTP, at most one live code per address.
//!
//! ## Recurrence
//!
//! Events store a recurrence descriptor (`none`/`daily`/`weekly`, weekday set,
//! until-date) verbatim. The server never expands occurrences or dispatches
//! reminders; interpretation is left to clients.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
