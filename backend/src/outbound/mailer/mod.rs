//! Mail adapters.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{Mailer, MailerError, OutgoingEmail};

/// Mailer that records each delivery as a structured log event.
///
/// Bodies are not logged because login-code emails carry a secret.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        info!(
            to = %email.to,
            subject = %email.subject,
            body_len = email.body.len(),
            "email dispatched"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;

    #[tokio::test]
    async fn delivery_always_succeeds() {
        let email = OutgoingEmail {
            to: EmailAddress::parse("fan@example.com").expect("valid email"),
            subject: "Weekly round-up".to_owned(),
            body: "Hello".to_owned(),
        };
        assert!(TracingMailer.send(&email).await.is_ok());
    }
}
