//! Subscriber service: idempotent subscribe plus admin maintenance.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    SubscriberRepository, SubscriberRepositoryError, SubscribersCommand, SubscribersQuery,
};
use crate::domain::{Error, NewSubscriber, Subscriber, SubscriberPatch, Subscription};

const NOT_FOUND: &str = "Subscriber not found";

#[derive(Clone)]
pub struct SubscriberService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> SubscriberService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

pub(crate) fn map_subscriber_error(error: SubscriberRepositoryError) -> Error {
    match error {
        SubscriberRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("subscriber repository unavailable: {message}"))
        }
        SubscriberRepositoryError::Query { message } => {
            Error::internal(format!("subscriber repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> SubscribersQuery for SubscriberService<R>
where
    R: SubscriberRepository,
{
    async fn list(&self) -> Result<Vec<Subscriber>, Error> {
        self.repo.list().await.map_err(map_subscriber_error)
    }
}

#[async_trait]
impl<R> SubscribersCommand for SubscriberService<R>
where
    R: SubscriberRepository,
{
    async fn subscribe(&self, subscriber: NewSubscriber) -> Result<Subscription, Error> {
        let candidate = subscriber.into_subscriber(Uuid::new_v4(), self.clock.utc());
        let stored = self
            .repo
            .insert_if_absent(&candidate)
            .await
            .map_err(map_subscriber_error)?;
        Ok(match stored {
            Some(subscriber) => {
                info!(subscriber_id = %subscriber.id, "subscriber added");
                Subscription::Created(subscriber)
            }
            None => Subscription::AlreadySubscribed,
        })
    }

    async fn update(&self, id: Uuid, patch: SubscriberPatch) -> Result<Subscriber, Error> {
        let changes = patch.resolve()?;
        self.repo
            .update(id, &changes)
            .await
            .map_err(map_subscriber_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        if self.repo.delete(id).await.map_err(map_subscriber_error)? {
            Ok(())
        } else {
            Err(Error::not_found(NOT_FOUND))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockSubscriberRepository;
    use crate::domain::{EmailAddress, SubscriberPreferences};
    use mockable::DefaultClock;
    use rstest::rstest;

    fn request() -> NewSubscriber {
        NewSubscriber {
            email: EmailAddress::parse("a@x.com").expect("email"),
            name: None,
            preferences: SubscriberPreferences::default(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_reported_not_raised() {
        let mut repo = MockSubscriberRepository::new();
        repo.expect_insert_if_absent().return_once(|_| Ok(None));
        let service = SubscriberService::new(Arc::new(repo), Arc::new(DefaultClock));

        let outcome = service.subscribe(request()).await.expect("no error");

        assert_eq!(outcome, Subscription::AlreadySubscribed);
    }

    #[rstest]
    #[tokio::test]
    async fn new_email_is_created_active() {
        let mut repo = MockSubscriberRepository::new();
        repo.expect_insert_if_absent()
            .return_once(|candidate| Ok(Some(candidate.clone())));
        let service = SubscriberService::new(Arc::new(repo), Arc::new(DefaultClock));

        let outcome = service.subscribe(request()).await.expect("created");

        let Subscription::Created(subscriber) = outcome else {
            panic!("expected a new subscriber");
        };
        assert!(subscriber.active);
        assert_eq!(subscriber.email.as_str(), "a@x.com");
    }
}
