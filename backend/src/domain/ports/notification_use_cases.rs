//! Driving ports for notifications and newsletter sends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Category, Error, NewNotification, Notification};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsQuery: Send + Sync {
    async fn list(&self) -> Result<Vec<Notification>, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsCommand: Send + Sync {
    async fn append(&self, notification: NewNotification) -> Result<Notification, Error>;
}

/// A newsletter to send to active subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterRequest {
    pub subject: String,
    pub body: String,
    /// Restrict delivery to subscribers interested in this category.
    #[serde(default)]
    pub category: Option<Category>,
}

/// Outcome of a newsletter send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterReceipt {
    /// Number of subscribers the newsletter was delivered to.
    pub recipients: usize,
    /// Deliveries the mail transport rejected.
    pub failed: usize,
    /// Deliveries that went out but could not be written to the notification log.
    pub unlogged: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsletterCommand: Send + Sync {
    async fn send(&self, request: NewsletterRequest) -> Result<NewsletterReceipt, Error>;
}
