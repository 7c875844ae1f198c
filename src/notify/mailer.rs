//! SMTP delivery of rendered notifications via lettre.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;
use tracing::info;

use crate::config::MailConfig;
use crate::error::NotifyError;
use crate::notify::templates::RenderedEmail;

/// Sends notification emails through an authenticated SMTP relay.
pub struct Mailer {
    config: MailConfig,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Build the HTML message without sending it.
    pub fn build_message(&self, to: &str, email: &RenderedEmail) -> Result<Message, NotifyError> {
        let from = self.config.from_address.parse().map_err(|e| NotifyError::InvalidAddress {
            address: self.config.from_address.clone(),
            reason: format!("{e}"),
        })?;
        let to = to.parse().map_err(|e| NotifyError::InvalidAddress {
            address: to.to_string(),
            reason: format!("{e}"),
        })?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| NotifyError::SendFailed(format!("Failed to build email: {e}")))
    }

    /// Send a rendered notification to `to`.
    ///
    /// Blocking; call from `spawn_blocking` inside async code.
    pub fn send(&self, to: &str, email: &RenderedEmail) -> Result<(), NotifyError> {
        let message = self.build_message(to, email)?;

        let creds = Credentials::new(
            self.config.username.clone(),
            self.config.password.expose_secret().to_string(),
        );
        let transport = SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| NotifyError::SendFailed(format!("SMTP relay error: {e}")))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();

        transport
            .send(&message)
            .map_err(|e| NotifyError::SendFailed(format!("SMTP send failed: {e}")))?;

        info!(to = %to, subject = %email.subject, "Notification email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn mailer(from_address: &str) -> Mailer {
        Mailer::new(MailConfig {
            smtp_host: "smtp.example.com".into(),
            smtp_port: 587,
            username: "notices@example.com".into(),
            password: SecretString::from("secret"),
            from_address: from_address.into(),
        })
    }

    fn email() -> RenderedEmail {
        RenderedEmail {
            subject: "Application received - Driving Prohibition Review 21900040".into(),
            html: "<p>Dear Bob Smith,</p>".into(),
        }
    }

    #[test]
    fn builds_html_message() {
        let message = mailer("notices@example.com")
            .build_message("bob@example.com", &email())
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("To: bob@example.com"));
        assert!(raw.contains("From: notices@example.com"));
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("Driving Prohibition Review 21900040"));
    }

    #[test]
    fn rejects_invalid_recipient() {
        let err = mailer("notices@example.com")
            .build_message("not an address", &email())
            .unwrap_err();
        assert!(matches!(err, NotifyError::InvalidAddress { ref address, .. } if address == "not an address"));
    }

    #[test]
    fn rejects_invalid_sender() {
        let err = mailer("").build_message("bob@example.com", &email()).unwrap_err();
        assert!(matches!(err, NotifyError::InvalidAddress { .. }));
    }
}
