//! Driving ports for static pages.

use async_trait::async_trait;

use crate::domain::{Error, Page, PagePatch, PageSlug};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PagesQuery: Send + Sync {
    async fn list(&self) -> Result<Vec<Page>, Error>;

    async fn find(&self, slug: &PageSlug) -> Result<Page, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PagesCommand: Send + Sync {
    async fn update(&self, slug: &PageSlug, patch: PagePatch) -> Result<Page, Error>;
}
