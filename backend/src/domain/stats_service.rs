//! Dashboard statistics computed from the article and subscriber stores.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::article_service::map_article_error;
use crate::domain::ports::{ArticleRepository, DashboardStatsQuery, SubscriberRepository};
use crate::domain::subscriber_service::map_subscriber_error;
use crate::domain::{DashboardStats, Error};

#[derive(Clone)]
pub struct DashboardStatsService<A, S> {
    articles: Arc<A>,
    subscribers: Arc<S>,
}

impl<A, S> DashboardStatsService<A, S> {
    pub fn new(articles: Arc<A>, subscribers: Arc<S>) -> Self {
        Self {
            articles,
            subscribers,
        }
    }
}

#[async_trait]
impl<A, S> DashboardStatsQuery for DashboardStatsService<A, S>
where
    A: ArticleRepository,
    S: SubscriberRepository,
{
    async fn stats(&self) -> Result<DashboardStats, Error> {
        let articles = self.articles.list_all().await.map_err(map_article_error)?;
        let subscribers = self.subscribers.list().await.map_err(map_subscriber_error)?;
        Ok(DashboardStats::tally(&articles, &subscribers))
    }
}
