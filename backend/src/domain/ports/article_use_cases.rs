//! Driving ports for article reads and editorial changes.
//!
//! [`ArticlesQuery`] serves the public site and only ever exposes published
//! articles. [`ArticlesCommand`] serves the admin dashboard.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Article, ArticlePatch, Error, NewArticle};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticlesQuery: Send + Sync {
    async fn list_published(&self) -> Result<Vec<Article>, Error>;

    /// Fetch a published article and count the read.
    async fn read_published(&self, id: Uuid) -> Result<Article, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticlesCommand: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Article>, Error>;

    async fn find(&self, id: Uuid) -> Result<Article, Error>;

    async fn create(&self, article: NewArticle) -> Result<Article, Error>;

    async fn update(&self, id: Uuid, patch: ArticlePatch) -> Result<Article, Error>;

    async fn delete(&self, id: Uuid) -> Result<(), Error>;
}
