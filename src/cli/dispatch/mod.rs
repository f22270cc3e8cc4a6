//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{auth, email};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let auth_opts = auth::Options::parse(matches)?;
    let email_opts = email::Options::parse(matches);

    Ok(Action::Server(Box::new(Args {
        port,
        dsn,
        jwt_secret: SecretString::from(auth_opts.jwt_secret),
        token_ttl_seconds: auth_opts.token_ttl_seconds,
        otp_ttl_seconds: auth_opts.otp_ttl_seconds,
        bcrypt_cost: auth_opts.bcrypt_cost,
        smtp_relay: email_opts.smtp_relay,
        smtp_username: email_opts.smtp_username,
        smtp_password: email_opts.smtp_password.map(SecretString::from),
        email_from: email_opts.email_from,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::actions::Action;

    #[test]
    fn server_action_from_matches() {
        let command = crate::cli::commands::new();
        let matches = command.get_matches_from(vec![
            "tempora",
            "--port",
            "9090",
            "--dsn",
            "postgres://user@localhost:5432/tempora",
            "--jwt-secret",
            "secret",
        ]);

        let action = handler(&matches).expect("action");
        let Action::Server(args) = action;
        assert_eq!(args.port, 9090);
        assert_eq!(args.dsn, "postgres://user@localhost:5432/tempora");
        assert_eq!(args.token_ttl_seconds, 604_800);
        assert_eq!(args.otp_ttl_seconds, 90);
        assert!(args.smtp_relay.is_none());
    }
}
