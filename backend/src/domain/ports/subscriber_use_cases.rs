//! Driving ports for the subscriber list.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, NewSubscriber, Subscriber, SubscriberPatch, Subscription};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscribersQuery: Send + Sync {
    async fn list(&self) -> Result<Vec<Subscriber>, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscribersCommand: Send + Sync {
    /// Subscribe an email. Repeating a known email is not an error.
    async fn subscribe(&self, subscriber: NewSubscriber) -> Result<Subscription, Error>;

    async fn update(&self, id: Uuid, patch: SubscriberPatch) -> Result<Subscriber, Error>;

    async fn delete(&self, id: Uuid) -> Result<(), Error>;
}
