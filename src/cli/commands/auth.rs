use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_TOKEN_TTL_SECONDS: &str = "token-ttl-seconds";
pub const ARG_OTP_TTL_SECONDS: &str = "otp-ttl-seconds";
pub const ARG_BCRYPT_COST: &str = "bcrypt-cost";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Secret used to sign and verify session tokens (HS256)")
                .env("TEMPORA_JWT_SECRET")
                .required(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL_SECONDS)
                .long(ARG_TOKEN_TTL_SECONDS)
                .help("Session token validity window in seconds")
                .default_value("604800")
                .env("TEMPORA_TOKEN_TTL_SECONDS")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_OTP_TTL_SECONDS)
                .long(ARG_OTP_TTL_SECONDS)
                .help("OTP validity window in seconds")
                .default_value("90")
                .env("TEMPORA_OTP_TTL_SECONDS")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_BCRYPT_COST)
                .long(ARG_BCRYPT_COST)
                .help("bcrypt cost factor for password hashing")
                .default_value("10")
                .env("TEMPORA_BCRYPT_COST")
                .value_parser(clap::value_parser!(u32)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub jwt_secret: String,
    pub token_ttl_seconds: i64,
    pub otp_ttl_seconds: i64,
    pub bcrypt_cost: u32,
}

impl Options {
    /// Extract auth options from validated CLI matches.
    ///
    /// # Errors
    /// Returns an error if a required argument is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            jwt_secret: matches
                .get_one::<String>(ARG_JWT_SECRET)
                .cloned()
                .context("missing required argument: --jwt-secret")?,
            token_ttl_seconds: matches
                .get_one::<i64>(ARG_TOKEN_TTL_SECONDS)
                .copied()
                .unwrap_or(7 * 24 * 60 * 60),
            otp_ttl_seconds: matches
                .get_one::<i64>(ARG_OTP_TTL_SECONDS)
                .copied()
                .unwrap_or(90),
            bcrypt_cost: matches
                .get_one::<u32>(ARG_BCRYPT_COST)
                .copied()
                .unwrap_or(10),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let command = crate::cli::commands::new();
        let matches = command.get_matches_from(vec![
            "tempora",
            "--dsn",
            "postgres://localhost:5432/tempora",
            "--jwt-secret",
            "secret",
        ]);

        let options = Options::parse(&matches).expect("options");
        assert_eq!(options.jwt_secret, "secret");
        assert_eq!(options.token_ttl_seconds, 604_800);
        assert_eq!(options.otp_ttl_seconds, 90);
        assert_eq!(options.bcrypt_cost, 10);
    }

    #[test]
    fn parse_overrides() {
        let command = crate::cli::commands::new();
        let matches = command.get_matches_from(vec![
            "tempora",
            "--dsn",
            "postgres://localhost:5432/tempora",
            "--jwt-secret",
            "secret",
            "--token-ttl-seconds",
            "3600",
            "--otp-ttl-seconds",
            "120",
            "--bcrypt-cost",
            "4",
        ]);

        let options = Options::parse(&matches).expect("options");
        assert_eq!(options.token_ttl_seconds, 3600);
        assert_eq!(options.otp_ttl_seconds, 120);
        assert_eq!(options.bcrypt_cost, 4);
    }
}
