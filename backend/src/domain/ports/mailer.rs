//! Outbound email port.

use async_trait::async_trait;

use crate::domain::EmailAddress;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail adapters.
    pub enum MailerError {
        /// The message could not be handed to the transport.
        Delivery { message: String } => "mail delivery failed: {message}",
    }
}

/// A single outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: EmailAddress,
    pub subject: String,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError>;
}
