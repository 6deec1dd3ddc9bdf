//! Port for subscriber persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Subscriber, SubscriberChanges};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subscriber repository adapters.
    pub enum SubscriberRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "subscriber repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "subscriber repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// All subscribers, newest first.
    async fn list(&self) -> Result<Vec<Subscriber>, SubscriberRepositoryError>;

    /// Active subscribers only, newest first.
    async fn list_active(&self) -> Result<Vec<Subscriber>, SubscriberRepositoryError>;

    /// Insert unless the email is already present.
    ///
    /// Returns the stored row, or `None` when the email already existed. The
    /// existing row is left untouched.
    async fn insert_if_absent(
        &self,
        subscriber: &Subscriber,
    ) -> Result<Option<Subscriber>, SubscriberRepositoryError>;

    async fn update(
        &self,
        id: Uuid,
        changes: &SubscriberChanges,
    ) -> Result<Option<Subscriber>, SubscriberRepositoryError>;

    /// Hard-delete; returns `false` when nothing matched.
    async fn delete(&self, id: Uuid) -> Result<bool, SubscriberRepositoryError>;
}
