//! Port for the append-only notification log.

use async_trait::async_trait;

use crate::domain::Notification;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// All notifications, most recently sent first.
    async fn list(&self) -> Result<Vec<Notification>, NotificationRepositoryError>;

    async fn append(&self, notification: &Notification) -> Result<(), NotificationRepositoryError>;
}
