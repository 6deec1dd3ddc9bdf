//! Port for static page persistence.

use async_trait::async_trait;

use crate::domain::{Page, PageChanges, PageSlug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by page repository adapters.
    pub enum PageRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "page repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "page repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// All pages ordered by slug.
    async fn list(&self) -> Result<Vec<Page>, PageRepositoryError>;

    async fn find_by_slug(&self, slug: &PageSlug) -> Result<Option<Page>, PageRepositoryError>;

    /// Merge `changes` into an existing page. Pages are never created here.
    async fn update(
        &self,
        slug: &PageSlug,
        changes: &PageChanges,
    ) -> Result<Option<Page>, PageRepositoryError>;
}
