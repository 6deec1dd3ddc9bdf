//! PostgreSQL-backed `SubscriberRepository` implementation using Diesel ORM.
//!
//! Subscribing relies on `ON CONFLICT (email) DO NOTHING`, so two concurrent
//! requests for the same address yield exactly one row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{SubscriberRepository, SubscriberRepositoryError};
use crate::domain::{
    Category, EmailAddress, Frequency, Subscriber, SubscriberChanges, SubscriberPreferences,
};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{NewSubscriberRow, SubscriberRow, SubscriberUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::subscribers;

#[derive(Clone)]
pub struct DieselSubscriberRepository {
    pool: DbPool,
}

impl DieselSubscriberRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> SubscriberRepositoryError {
    map_pool_error(error, |message| SubscriberRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> SubscriberRepositoryError {
    map_diesel_error(
        error,
        |message| SubscriberRepositoryError::query(message),
        |message| SubscriberRepositoryError::connection(message),
    )
}

fn category_names(categories: &[Category]) -> Vec<String> {
    categories
        .iter()
        .map(|category| category.as_str().to_owned())
        .collect()
}

fn row_to_subscriber(row: SubscriberRow) -> Result<Subscriber, SubscriberRepositoryError> {
    let email =
        EmailAddress::parse(&row.email).map_err(|err| SubscriberRepositoryError::query(err.to_string()))?;
    let categories = row
        .categories
        .iter()
        .filter_map(|raw| match raw.parse::<Category>() {
            Ok(category) => Some(category),
            Err(_) => {
                warn!(subscriber_id = %row.id, value = %raw, "dropping unrecognised category preference");
                None
            }
        })
        .collect();
    let frequency = row
        .frequency
        .parse::<Frequency>()
        .map_err(|err| SubscriberRepositoryError::query(err.to_string()))?;
    Ok(Subscriber {
        id: row.id,
        email,
        name: row.name,
        subscribed_at: row.subscribed_at,
        active: row.active,
        preferences: SubscriberPreferences {
            categories,
            frequency,
        },
    })
}

fn rows_to_subscribers(
    rows: Vec<SubscriberRow>,
) -> Result<Vec<Subscriber>, SubscriberRepositoryError> {
    rows.into_iter().map(row_to_subscriber).collect()
}

#[async_trait]
impl SubscriberRepository for DieselSubscriberRepository {
    async fn list(&self) -> Result<Vec<Subscriber>, SubscriberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = subscribers::table
            .order(subscribers::subscribed_at.desc())
            .select(SubscriberRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_subscribers(rows)
    }

    async fn list_active(&self) -> Result<Vec<Subscriber>, SubscriberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = subscribers::table
            .filter(subscribers::active.eq(true))
            .order(subscribers::subscribed_at.desc())
            .select(SubscriberRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_subscribers(rows)
    }

    async fn insert_if_absent(
        &self,
        subscriber: &Subscriber,
    ) -> Result<Option<Subscriber>, SubscriberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let categories = category_names(&subscriber.preferences.categories);
        let row = NewSubscriberRow {
            id: subscriber.id,
            email: subscriber.email.as_str(),
            name: subscriber.name.as_deref(),
            subscribed_at: subscriber.subscribed_at,
            active: subscriber.active,
            categories: &categories,
            frequency: subscriber.preferences.frequency.as_str(),
        };
        diesel::insert_into(subscribers::table)
            .values(&row)
            .on_conflict(subscribers::email)
            .do_nothing()
            .returning(SubscriberRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_subscriber)
            .transpose()
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &SubscriberChanges,
    ) -> Result<Option<Subscriber>, SubscriberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        if changes.is_empty() {
            // An empty changeset is a Diesel error; read the row instead.
            return subscribers::table
                .find(id)
                .select(SubscriberRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(diesel_error)?
                .map(row_to_subscriber)
                .transpose();
        }
        let categories = changes
            .preferences
            .as_ref()
            .map(|preferences| category_names(&preferences.categories));
        let update = SubscriberUpdate {
            name: changes.name.as_ref().map(Option::as_deref),
            active: changes.active,
            categories: categories.as_deref(),
            frequency: changes
                .preferences
                .as_ref()
                .map(|preferences| preferences.frequency.as_str()),
        };
        diesel::update(subscribers::table.find(id))
            .set(&update)
            .returning(SubscriberRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_subscriber)
            .transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SubscriberRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(subscribers::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}
