//! Notification log and newsletter delivery.
//!
//! A newsletter send mails every active subscriber whose preferences match
//! and records one notification per successful delivery. Failed deliveries
//! are logged and counted; they do not abort the send.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    Mailer, NewsletterCommand, NewsletterReceipt, NewsletterRequest, NotificationRepository,
    NotificationRepositoryError, NotificationsCommand, NotificationsQuery, OutgoingEmail,
    SubscriberRepository,
};
use crate::domain::subscriber_service::map_subscriber_error;
use crate::domain::{Error, NewNotification, Notification};

#[derive(Clone)]
pub struct NotificationService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> NotificationService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

fn map_notification_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> NotificationsQuery for NotificationService<R>
where
    R: NotificationRepository,
{
    async fn list(&self) -> Result<Vec<Notification>, Error> {
        self.repo.list().await.map_err(map_notification_error)
    }
}

#[async_trait]
impl<R> NotificationsCommand for NotificationService<R>
where
    R: NotificationRepository,
{
    async fn append(&self, notification: NewNotification) -> Result<Notification, Error> {
        let notification = notification.into_notification(Uuid::new_v4(), self.clock.utc());
        self.repo
            .append(&notification)
            .await
            .map_err(map_notification_error)?;
        Ok(notification)
    }
}

/// Newsletter sender over subscribers, the notification log and a mailer.
#[derive(Clone)]
pub struct NewsletterService<S, N, M> {
    subscribers: Arc<S>,
    notifications: NotificationService<N>,
    mailer: Arc<M>,
}

impl<S, N, M> NewsletterService<S, N, M> {
    pub fn new(
        subscribers: Arc<S>,
        notifications: Arc<N>,
        mailer: Arc<M>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            subscribers,
            notifications: NotificationService::new(notifications, clock),
            mailer,
        }
    }
}

fn validate_request(request: &NewsletterRequest) -> Result<(), Error> {
    for (field, value) in [("subject", &request.subject), ("body", &request.body)] {
        if value.trim().is_empty() {
            return Err(Error::invalid_request(format!("{field} must not be empty"))
                .with_details(json!({ "field": field, "code": "empty_field" })));
        }
    }
    Ok(())
}

#[async_trait]
impl<S, N, M> NewsletterCommand for NewsletterService<S, N, M>
where
    S: SubscriberRepository,
    N: NotificationRepository,
    M: Mailer,
{
    async fn send(&self, request: NewsletterRequest) -> Result<NewsletterReceipt, Error> {
        validate_request(&request)?;
        let audience = self
            .subscribers
            .list_active()
            .await
            .map_err(map_subscriber_error)?;

        let mut receipt = NewsletterReceipt {
            recipients: 0,
            failed: 0,
            unlogged: 0,
        };
        for subscriber in audience
            .into_iter()
            .filter(|subscriber| subscriber.preferences.wants(request.category))
        {
            let record = NewNotification::new(subscriber.email.clone(), request.subject.clone())?;
            let email = OutgoingEmail {
                to: subscriber.email,
                subject: request.subject.clone(),
                body: request.body.clone(),
            };
            if let Err(err) = self.mailer.send(&email).await {
                warn!(subscriber_id = %subscriber.id, error = %err, "newsletter delivery failed");
                receipt.failed += 1;
                continue;
            }
            receipt.recipients += 1;
            // Delivered mail cannot be recalled; a log failure must not stop the run.
            if let Err(err) = self.notifications.append(record).await {
                warn!(subscriber_id = %subscriber.id, error = %err, "newsletter delivery not logged");
                receipt.unlogged += 1;
            }
        }

        info!(
            recipients = receipt.recipients,
            failed = receipt.failed,
            unlogged = receipt.unlogged,
            "newsletter sent"
        );
        Ok(receipt)
    }
}
