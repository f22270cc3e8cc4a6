//! Outbound email delivery.
//!
//! OTP issuance and password reset both send mail on the request's critical
//! path: the handler awaits delivery (including the transport-level connection
//! check) before responding, and a transport failure fails the request. There
//! is no outbox, retry, or backpressure at this layer.
//!
//! The default for local development is `LogMailer`, which logs the message
//! and returns `Ok(())`. `SmtpMailer` is used when an SMTP relay is
//! configured.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::info;

/// Email delivery abstraction used by the auth handlers.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message or return an error, which the caller treats as fatal
    /// to the current request.
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()>;
}

/// Local dev mailer that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    #[must_use]
    pub fn new(from: String) -> Self {
        Self { from }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        info!(
            from = %self.from,
            to = %to,
            subject = %subject,
            body = %html_body,
            "email send stub"
        );
        Ok(())
    }
}

/// SMTP mailer over a TLS relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build an SMTP transport for the given relay.
    ///
    /// # Errors
    /// Returns an error if the relay hostname or the from address is invalid.
    pub fn new(
        relay: &str,
        username: Option<&str>,
        password: Option<&str>,
        from: String,
    ) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(relay)
            .with_context(|| format!("Invalid SMTP relay: {relay}"))?;

        if let (Some(username), Some(password)) = (username, password) {
            builder = builder.credentials(Credentials::new(
                username.to_string(),
                password.to_string(),
            ));
        }

        let from = from
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid from address: {from}"))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        // Verify the relay connection before handing over the message, so a
        // dead transport surfaces as an error instead of a silent queue.
        let connected = self
            .transport
            .test_connection()
            .await
            .context("SMTP connection check failed")?;
        if !connected {
            return Err(anyhow!("SMTP relay refused the connection"));
        }

        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse::<Mailbox>()
                .with_context(|| format!("Invalid recipient address: {to}"))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .context("Failed to build email message")?;

        let response = self
            .transport
            .send(message)
            .await
            .context("Failed to send email")?;

        info!(to = %to, code = %response.code(), "email sent");

        Ok(())
    }
}

/// HTML body for the OTP verification email.
#[must_use]
pub fn otp_email_html(otp: &str, ttl_seconds: i64) -> String {
    format!(
        r#"<div style="max-width: 600px; margin: 0 auto; padding: 20px; font-family: Arial, sans-serif;">
  <h1 style="color: #2196F3; text-align: center;">Tempora</h1>
  <h2 style="color: #333; text-align: center;">Confirm your email</h2>
  <p>You requested an account verification code. Use the code below to confirm your email address:</p>
  <div style="text-align: center; margin: 30px 0;">
    <div style="background-color: #2196F3; color: white; font-size: 32px; font-weight: bold; padding: 15px 30px; border-radius: 8px; display: inline-block; letter-spacing: 8px;">{otp}</div>
  </div>
  <p style="color: #666; font-size: 14px; text-align: center;">This code is valid for <strong>{ttl_seconds} seconds</strong>.</p>
  <p style="color: #666; font-size: 12px;">If you did not request an account, please ignore this email.</p>
</div>"#
    )
}

/// HTML body for the password reset email.
///
/// The new password is sent in cleartext; the reset flow replaces the stored
/// password before this mail is sent.
#[must_use]
pub fn new_password_email_html(password: &str) -> String {
    format!(
        r#"<div style="max-width: 600px; margin: 0 auto; padding: 20px; font-family: Arial, sans-serif;">
  <h1 style="color: #2196F3; text-align: center;">Tempora</h1>
  <h2 style="color: #333; text-align: center;">Your new password</h2>
  <p>You requested a password reset. Your new password is:</p>
  <div style="text-align: center; margin: 30px 0;">
    <div style="background-color: #2196F3; color: white; font-size: 32px; font-weight: bold; padding: 15px 30px; border-radius: 8px; display: inline-block; letter-spacing: 8px;">{password}</div>
  </div>
  <p style="color: #666; font-size: 14px; text-align: center;">Please sign in with this password.</p>
  <p style="color: #FF5722; font-size: 14px; text-align: center;"><strong>Note:</strong> change your password after signing in.</p>
  <p style="color: #666; font-size: 12px;">If you did not request a password reset, contact support immediately.</p>
</div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let mailer = LogMailer::new("Tempora <no-reply@tempora.dev>".to_string());
        let result = mailer
            .send("alice@example.com", "subject", "<p>body</p>")
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn smtp_mailer_rejects_invalid_from() {
        let result = SmtpMailer::new("smtp.example.com", None, None, "not an address".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn otp_email_contains_code_and_ttl() {
        let html = otp_email_html("123456", 90);
        assert!(html.contains("123456"));
        assert!(html.contains("90 seconds"));
    }

    #[test]
    fn password_email_contains_password() {
        let html = new_password_email_html("654321");
        assert!(html.contains("654321"));
    }
}
