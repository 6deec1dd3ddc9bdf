//! Static page service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{PageRepository, PageRepositoryError, PagesCommand, PagesQuery};
use crate::domain::{Error, Page, PagePatch, PageSlug};

const NOT_FOUND: &str = "Page not found";

#[derive(Clone)]
pub struct PageService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> PageService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

fn map_page_error(error: PageRepositoryError) -> Error {
    match error {
        PageRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("page repository unavailable: {message}"))
        }
        PageRepositoryError::Query { message } => {
            Error::internal(format!("page repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> PagesQuery for PageService<R>
where
    R: PageRepository,
{
    async fn list(&self) -> Result<Vec<Page>, Error> {
        self.repo.list().await.map_err(map_page_error)
    }

    async fn find(&self, slug: &PageSlug) -> Result<Page, Error> {
        self.repo
            .find_by_slug(slug)
            .await
            .map_err(map_page_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }
}

#[async_trait]
impl<R> PagesCommand for PageService<R>
where
    R: PageRepository,
{
    async fn update(&self, slug: &PageSlug, patch: PagePatch) -> Result<Page, Error> {
        let changes = patch.resolve(self.clock.utc())?;
        self.repo
            .update(slug, &changes)
            .await
            .map_err(map_page_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }
}
