//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Insert and changeset structs borrow from
//! domain values so writes do not clone large text columns.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{admins, articles, login_codes, notifications, pages, subscribers};

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArticleRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub featured: bool,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub read_time: i32,
    pub views: i64,
    pub author: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = articles)]
pub(crate) struct NewArticleRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
    pub excerpt: &'a str,
    pub category: &'a str,
    pub tags: &'a [String],
    pub published: bool,
    pub featured: bool,
    pub image_url: Option<&'a str>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub read_time: i32,
    pub views: i64,
    pub author: &'a str,
}

/// Sparse article changeset. `None` skips a column; `Some(None)` writes NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = articles)]
pub(crate) struct ArticleUpdate<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub excerpt: Option<&'a str>,
    pub category: Option<&'a str>,
    pub tags: Option<&'a [String]>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub image_url: Option<Option<&'a str>>,
    pub published_at: Option<Option<DateTime<Utc>>>,
    pub read_time: Option<i32>,
    pub author: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PageRow {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pages)]
pub(crate) struct PageUpdate<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = subscribers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubscriberRow {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub subscribed_at: DateTime<Utc>,
    pub active: bool,
    pub categories: Vec<String>,
    pub frequency: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subscribers)]
pub(crate) struct NewSubscriberRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: Option<&'a str>,
    pub subscribed_at: DateTime<Utc>,
    pub active: bool,
    pub categories: &'a [String],
    pub frequency: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = subscribers)]
pub(crate) struct SubscriberUpdate<'a> {
    pub name: Option<Option<&'a str>>,
    pub active: Option<bool>,
    pub categories: Option<&'a [String]>,
    pub frequency: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_email: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub user_email: &'a str,
    pub message: &'a str,
    pub sent_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Admins and login codes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdminRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_digest: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = admins)]
pub(crate) struct NewAdminRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_digest: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = admins)]
pub(crate) struct AdminUpdate<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password_digest: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = login_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoginCodeRow {
    pub email: String,
    pub code_digest: String,
    pub expires_at: DateTime<Utc>,
    pub failed_attempts: i32,
}
