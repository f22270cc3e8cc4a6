use crate::api::{
    self,
    email::{LogMailer, Mailer, SmtpMailer},
    handlers::auth::{AuthConfig, AuthState, claims::TokenKeys},
};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub jwt_secret: SecretString,
    pub token_ttl_seconds: i64,
    pub otp_ttl_seconds: i64,
    pub bcrypt_cost: u32,
    pub smtp_relay: Option<String>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<SecretString>,
    pub email_from: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the SMTP transport cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = AuthConfig::new()
        .with_token_ttl_seconds(args.token_ttl_seconds)
        .with_otp_ttl_seconds(args.otp_ttl_seconds)
        .with_bcrypt_cost(args.bcrypt_cost);

    let keys = TokenKeys::from_secret(args.jwt_secret.expose_secret().as_bytes());
    let auth_state = Arc::new(AuthState::new(config, keys));

    let mailer: Arc<dyn Mailer> = match &args.smtp_relay {
        Some(relay) => Arc::new(SmtpMailer::new(
            relay,
            args.smtp_username.as_deref(),
            args.smtp_password
                .as_ref()
                .map(ExposeSecret::expose_secret),
            args.email_from.clone(),
        )?),
        None => Arc::new(LogMailer::new(args.email_from.clone())),
    };

    api::new(args.port, args.dsn, auth_state, mailer).await
}
