//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the content repository
//! ports backed by PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel rows and domain types. Merge rules live in the domain.
//! - **Internal models**: Row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: Diesel and pool failures are mapped onto each
//!   port's own error enum.
//!
//! # Example
//!
//! ```ignore
//! use footballvoice::outbound::persistence::{DbPool, DieselArticleRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/footballvoice")).await?;
//! let articles = DieselArticleRepository::new(pool);
//! ```

pub(crate) mod diesel_helpers;
mod diesel_admin_repository;
mod diesel_article_repository;
mod diesel_notification_repository;
mod diesel_page_repository;
mod diesel_subscriber_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_admin_repository::{DieselAdminRepository, DieselLoginCodeRepository};
pub use diesel_article_repository::DieselArticleRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_page_repository::DieselPageRepository;
pub use diesel_subscriber_repository::DieselSubscriberRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
