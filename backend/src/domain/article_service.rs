//! Article domain service implementing the public and editorial ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{ArticleRepository, ArticleRepositoryError, ArticlesCommand, ArticlesQuery};
use crate::domain::{Article, ArticlePatch, Error, NewArticle};

const NOT_FOUND: &str = "Article not found";

/// Article service backed by an [`ArticleRepository`].
#[derive(Clone)]
pub struct ArticleService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ArticleService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

pub(crate) fn map_article_error(error: ArticleRepositoryError) -> Error {
    match error {
        ArticleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("article repository unavailable: {message}"))
        }
        ArticleRepositoryError::Query { message } => {
            Error::internal(format!("article repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> ArticlesQuery for ArticleService<R>
where
    R: ArticleRepository,
{
    async fn list_published(&self) -> Result<Vec<Article>, Error> {
        self.repo.list_published().await.map_err(map_article_error)
    }

    async fn read_published(&self, id: Uuid) -> Result<Article, Error> {
        self.repo
            .record_view(id)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }
}

#[async_trait]
impl<R> ArticlesCommand for ArticleService<R>
where
    R: ArticleRepository,
{
    async fn list_all(&self) -> Result<Vec<Article>, Error> {
        self.repo.list_all().await.map_err(map_article_error)
    }

    async fn find(&self, id: Uuid) -> Result<Article, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    async fn create(&self, article: NewArticle) -> Result<Article, Error> {
        let article = article.into_article(Uuid::new_v4(), self.clock.utc())?;
        self.repo.insert(&article).await.map_err(map_article_error)?;
        info!(article_id = %article.id, published = article.published, "article created");
        Ok(article)
    }

    async fn update(&self, id: Uuid, patch: ArticlePatch) -> Result<Article, Error> {
        let current = if patch.needs_current() {
            Some(self.find(id).await?)
        } else {
            None
        };
        let changes = patch.resolve(current.as_ref(), self.clock.utc())?;
        self.repo
            .update(id, &changes)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        if self.repo.delete(id).await.map_err(map_article_error)? {
            info!(article_id = %id, "article deleted");
            Ok(())
        } else {
            Err(Error::not_found(NOT_FOUND))
        }
    }
}
