use clap::{Arg, ArgMatches, Command};

pub const ARG_SMTP_RELAY: &str = "smtp-relay";
pub const ARG_SMTP_USERNAME: &str = "smtp-username";
pub const ARG_SMTP_PASSWORD: &str = "smtp-password";
pub const ARG_EMAIL_FROM: &str = "email-from";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SMTP_RELAY)
                .long(ARG_SMTP_RELAY)
                .help("SMTP relay hostname; when unset, outbound mail is logged instead of sent")
                .env("TEMPORA_SMTP_RELAY"),
        )
        .arg(
            Arg::new(ARG_SMTP_USERNAME)
                .long(ARG_SMTP_USERNAME)
                .help("SMTP username")
                .env("TEMPORA_SMTP_USERNAME")
                .requires(ARG_SMTP_RELAY),
        )
        .arg(
            Arg::new(ARG_SMTP_PASSWORD)
                .long(ARG_SMTP_PASSWORD)
                .help("SMTP password")
                .env("TEMPORA_SMTP_PASSWORD")
                .requires(ARG_SMTP_USERNAME),
        )
        .arg(
            Arg::new(ARG_EMAIL_FROM)
                .long(ARG_EMAIL_FROM)
                .help("From address for outbound mail")
                .default_value("Tempora <no-reply@tempora.dev>")
                .env("TEMPORA_EMAIL_FROM"),
        )
}

#[derive(Debug)]
pub struct Options {
    pub smtp_relay: Option<String>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub email_from: String,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            smtp_relay: matches.get_one::<String>(ARG_SMTP_RELAY).cloned(),
            smtp_username: matches.get_one::<String>(ARG_SMTP_USERNAME).cloned(),
            smtp_password: matches.get_one::<String>(ARG_SMTP_PASSWORD).cloned(),
            email_from: matches
                .get_one::<String>(ARG_EMAIL_FROM)
                .cloned()
                .unwrap_or_else(|| "Tempora <no-reply@tempora.dev>".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_without_relay_defaults_to_log_delivery() {
        let command = crate::cli::commands::new();
        let matches = temp_env::with_vars(
            [
                ("TEMPORA_SMTP_RELAY", None::<&str>),
                ("TEMPORA_SMTP_USERNAME", None),
                ("TEMPORA_SMTP_PASSWORD", None),
            ],
            || {
                command.get_matches_from(vec![
                    "tempora",
                    "--dsn",
                    "postgres://localhost:5432/tempora",
                    "--jwt-secret",
                    "secret",
                ])
            },
        );

        let options = Options::parse(&matches);
        assert!(options.smtp_relay.is_none());
        assert_eq!(options.email_from, "Tempora <no-reply@tempora.dev>");
    }

    #[test]
    fn smtp_username_requires_relay() {
        let command = crate::cli::commands::new();
        let result = temp_env::with_vars([("TEMPORA_SMTP_RELAY", None::<&str>)], || {
            command.try_get_matches_from(vec![
                "tempora",
                "--dsn",
                "postgres://localhost:5432/tempora",
                "--jwt-secret",
                "secret",
                "--smtp-username",
                "mailer",
            ])
        });
        assert!(result.is_err());
    }
}
