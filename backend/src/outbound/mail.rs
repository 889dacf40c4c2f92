//! Email delivery adapters.
//!
//! [`SmtpEmailSender`] relays through an SMTP server with STARTTLS;
//! [`LoggingEmailSender`] writes messages to the log for development runs
//! without a mail server. [`mailer_from_settings`] picks between them.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{Mailbox, Message, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{info, warn};

use crate::domain::ports::{EmailSender, EmailSenderError, OutgoingEmail};
use crate::settings::AppSettings;

fn parse_mailbox(raw: &str) -> Result<Mailbox, EmailSenderError> {
    raw.parse::<Mailbox>()
        .map_err(|err| EmailSenderError::message(format!("invalid address `{raw}`: {err}")))
}

fn build_message(from: &Mailbox, email: &OutgoingEmail) -> Result<Message, EmailSenderError> {
    let to = parse_mailbox(email.to.as_ref())?;
    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(email.subject.as_str())
        .header(header::ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|err| EmailSenderError::message(err.to_string()))
}

/// SMTP relay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

/// Sends mail through an SMTP relay.
#[derive(Clone)]
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    /// Configure the relay. No connection is opened until the first send.
    ///
    /// # Errors
    ///
    /// Returns [`EmailSenderError::Message`] for an unparsable sender address
    /// and [`EmailSenderError::Transport`] when the relay cannot be configured.
    pub fn new(settings: &SmtpSettings) -> Result<Self, EmailSenderError> {
        let from = parse_mailbox(&settings.from)?;
        let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|err| EmailSenderError::transport(err.to_string()))?
            .port(settings.port);
        let builder = match (&settings.username, &settings.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailSenderError> {
        let message = build_message(&self.from, email)?;
        self.transport
            .send(message)
            .await
            .map_err(|err| EmailSenderError::transport(err.to_string()))?;
        info!(subject = %email.subject, "email sent");
        Ok(())
    }
}

/// Logs messages instead of delivering them.
#[derive(Debug, Clone)]
pub struct LoggingEmailSender {
    from: String,
}

impl LoggingEmailSender {
    /// Sender that reports messages as coming from `from`.
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailSenderError> {
        info!(
            from = %self.from,
            to = %email.to,
            subject = %email.subject,
            body = %email.body,
            "no SMTP relay configured; logging email instead of sending"
        );
        Ok(())
    }
}

/// Mail sender described by `settings`.
///
/// A configured `smtp_host` selects [`SmtpEmailSender`]; otherwise messages
/// are logged through [`LoggingEmailSender`].
///
/// # Errors
///
/// Returns [`EmailSenderError`] when the relay or sender address is invalid.
pub fn mailer_from_settings(
    settings: &AppSettings,
) -> Result<Arc<dyn EmailSender>, EmailSenderError> {
    match &settings.smtp_host {
        Some(host) => {
            let mailer = SmtpEmailSender::new(&SmtpSettings {
                host: host.clone(),
                port: settings.smtp_port(),
                username: settings.smtp_username.clone(),
                password: settings.smtp_password.clone(),
                from: settings.from_email().to_owned(),
            })?;
            info!(host = %host, port = settings.smtp_port(), "sending mail through SMTP relay");
            Ok(Arc::new(mailer))
        }
        None => {
            warn!("no SMTP host configured; confirmation codes will be logged");
            Ok(Arc::new(LoggingEmailSender::new(settings.from_email())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;
    use rstest::{fixture, rstest};

    #[fixture]
    fn email() -> OutgoingEmail {
        OutgoingEmail {
            to: EmailAddress::new("ada@example.com").expect("valid address"),
            subject: "Email confirmation".to_owned(),
            body: "Your confirmation code: abc".to_owned(),
        }
    }

    #[rstest]
    fn message_carries_subject_and_body(email: OutgoingEmail) {
        let from = parse_mailbox("noreply@yamdb.local").expect("valid sender");
        let message = build_message(&from, &email).expect("message builds");
        let raw = String::from_utf8(message.formatted()).expect("utf-8 message");
        assert!(raw.contains("Subject: Email confirmation"));
        assert!(raw.contains("To: ada@example.com"));
        assert!(raw.contains("Your confirmation code: abc"));
    }

    #[rstest]
    fn bad_sender_is_a_message_error() {
        let err = parse_mailbox("not an address").expect_err("rejected");
        assert!(matches!(err, EmailSenderError::Message { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn logging_sender_accepts_everything(email: OutgoingEmail) {
        LoggingEmailSender::new("noreply@yamdb.local")
            .send(&email)
            .await
            .expect("logging never fails");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("not an address"))]
    #[tokio::test]
    async fn missing_relay_falls_back_to_logging(
        email: OutgoingEmail,
        #[case] from: Option<&str>,
    ) {
        let settings = AppSettings {
            from_email: from.map(str::to_owned),
            ..AppSettings::default()
        };
        let mailer = mailer_from_settings(&settings).expect("logging mailer");
        mailer.send(&email).await.expect("logging never fails");
    }

    #[rstest]
    fn relay_with_bad_sender_is_rejected() {
        let settings = AppSettings {
            smtp_host: Some("smtp.example.com".to_owned()),
            from_email: Some("not an address".to_owned()),
            ..AppSettings::default()
        };
        let err = mailer_from_settings(&settings)
            .err()
            .expect("sender address rejected");
        assert!(matches!(err, EmailSenderError::Message { .. }));
    }
}
