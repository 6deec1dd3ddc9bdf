//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{EmailAddress, Notification};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{NewNotificationRow, NotificationRow};
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> NotificationRepositoryError {
    map_pool_error(error, |message| NotificationRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> NotificationRepositoryError {
    map_diesel_error(
        error,
        |message| NotificationRepositoryError::query(message),
        |message| NotificationRepositoryError::connection(message),
    )
}

fn row_to_notification(row: NotificationRow) -> Result<Notification, NotificationRepositoryError> {
    let user_email = EmailAddress::parse(&row.user_email)
        .map_err(|err| NotificationRepositoryError::query(err.to_string()))?;
    Ok(Notification {
        id: row.id,
        user_email,
        message: row.message,
        sent_at: row.sent_at,
    })
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn list(&self) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<NotificationRow> = notifications::table
            .order(notifications::sent_at.desc())
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_notification).collect()
    }

    async fn append(&self, notification: &Notification) -> Result<(), NotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewNotificationRow {
            id: notification.id,
            user_email: notification.user_email.as_str(),
            message: &notification.message,
            sent_at: notification.sent_at,
        };
        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }
}
