//! Port for article persistence.
//!
//! Adapters must honour two guarantees the domain relies on: public reads
//! never surface unpublished rows, and the view counter is incremented in the
//! same statement that reads the article.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Article, ArticleChanges};

use super::define_port_error;

define_port_error! {
    /// Errors raised by article repository adapters.
    pub enum ArticleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "article repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Published articles, newest `published_at` first (nulls last), then
    /// newest `created_at`.
    async fn list_published(&self) -> Result<Vec<Article>, ArticleRepositoryError>;

    /// Every article, newest `created_at` first.
    async fn list_all(&self) -> Result<Vec<Article>, ArticleRepositoryError>;

    /// Fetch any article without side effects.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Atomically increment `views` on a published article and return it.
    ///
    /// Returns `None` when the article is missing or unpublished; in that case
    /// no counter changes.
    async fn record_view(&self, id: Uuid) -> Result<Option<Article>, ArticleRepositoryError>;

    async fn insert(&self, article: &Article) -> Result<(), ArticleRepositoryError>;

    /// Apply `changes` and return the merged row, or `None` for an unknown id.
    async fn update(
        &self,
        id: Uuid,
        changes: &ArticleChanges,
    ) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Hard-delete; returns `false` when nothing matched.
    async fn delete(&self, id: Uuid) -> Result<bool, ArticleRepositoryError>;
}
