//! Append-only log of messages sent to readers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{EmailAddress, Error};

/// A recorded notification. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_email: EmailAddress,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

/// Validated input for appending a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_email: EmailAddress,
    pub message: String,
}

impl NewNotification {
    pub fn new(user_email: EmailAddress, message: impl Into<String>) -> Result<Self, Error> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(Error::invalid_request("message must not be empty")
                .with_details(json!({ "field": "message", "code": "empty_message" })));
        }
        Ok(Self {
            user_email,
            message,
        })
    }

    pub fn into_notification(self, id: Uuid, now: DateTime<Utc>) -> Notification {
        Notification {
            id,
            user_email: self.user_email,
            message: self.message,
            sent_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("  \n")]
    fn blank_message_is_rejected(#[case] message: &str) {
        let email = EmailAddress::parse("a@x.com").expect("email");
        assert!(NewNotification::new(email, message).is_err());
    }
}
