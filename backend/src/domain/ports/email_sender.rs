//! Outbound notification channel used to deliver confirmation codes.
use async_trait::async_trait;

use crate::domain::EmailAddress;

use super::define_port_error;

define_port_error! {
    /// Errors raised while handing a message to the mail transport.
    pub enum EmailSenderError {
        /// The message could not be built (e.g. malformed address).
        Message { message: String } => "email message rejected: {message}",
        /// The transport refused or failed to deliver the message.
        Transport { message: String } => "email transport failed: {message}",
    }
}

/// Plain-text message addressed to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: EmailAddress,
    pub subject: String,
    pub body: String,
}

/// Port for sending email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver `email`; the sender address is adapter configuration.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailSenderError>;
}
