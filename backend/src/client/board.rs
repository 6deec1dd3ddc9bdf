//! Dashboard list views: an [`ApiClient`] paired with a [`ResourceCache`].
//!
//! Each mutating call goes to the server first and, once it succeeds, the
//! whole list is fetched again so the cache always mirrors server state.

use uuid::Uuid;

use super::{ApiClient, ArticleFilter, ClientError, ResourceCache};
use crate::domain::{Article, Subscriber, Subscription};
use crate::inbound::http::articles::{CreateArticleRequest, UpdateArticleRequest};
use crate::inbound::http::subscribers::{SubscribeRequest, UpdateSubscriberRequest};

/// Admin article list with local filtering.
pub struct ArticleBoard {
    client: ApiClient,
    cache: ResourceCache<Article>,
}

impl ArticleBoard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cache: ResourceCache::new(),
        }
    }

    pub fn cache(&self) -> &ResourceCache<Article> {
        &self.cache
    }

    pub async fn load(&mut self) {
        let client = &self.client;
        self.cache.refresh(|| client.list_articles()).await;
    }

    /// Cached articles passing `filter`, in server order.
    pub fn visible(&self, filter: &ArticleFilter) -> Vec<&Article> {
        filter.apply(self.cache.records())
    }

    pub async fn create(&mut self, article: &CreateArticleRequest) -> Result<Article, ClientError> {
        let client = &self.client;
        self.cache
            .mutate(|| client.create_article(article), || client.list_articles())
            .await
    }

    pub async fn update(
        &mut self,
        id: Uuid,
        patch: &UpdateArticleRequest,
    ) -> Result<Article, ClientError> {
        let client = &self.client;
        self.cache
            .mutate(|| client.update_article(id, patch), || client.list_articles())
            .await
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<(), ClientError> {
        let client = &self.client;
        self.cache
            .mutate(|| client.delete_article(id), || client.list_articles())
            .await
    }
}

/// Admin subscriber list.
pub struct SubscriberBoard {
    client: ApiClient,
    cache: ResourceCache<Subscriber>,
}

impl SubscriberBoard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cache: ResourceCache::new(),
        }
    }

    pub fn cache(&self) -> &ResourceCache<Subscriber> {
        &self.cache
    }

    pub async fn load(&mut self) {
        let client = &self.client;
        self.cache.refresh(|| client.list_subscribers()).await;
    }

    pub async fn subscribe(
        &mut self,
        request: &SubscribeRequest,
    ) -> Result<Subscription, ClientError> {
        let client = &self.client;
        self.cache
            .mutate(|| client.subscribe(request), || client.list_subscribers())
            .await
    }

    pub async fn update(
        &mut self,
        id: Uuid,
        patch: &UpdateSubscriberRequest,
    ) -> Result<Subscriber, ClientError> {
        let client = &self.client;
        self.cache
            .mutate(
                || client.update_subscriber(id, patch),
                || client.list_subscribers(),
            )
            .await
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<(), ClientError> {
        let client = &self.client;
        self.cache
            .mutate(|| client.delete_subscriber(id), || client.list_subscribers())
            .await
    }
}
