//! Dashboard totals.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Article, Subscriber};

/// Aggregate counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_articles: u64,
    pub published_articles: u64,
    pub draft_articles: u64,
    pub featured_articles: u64,
    pub total_views: u64,
    pub total_subscribers: u64,
    pub active_subscribers: u64,
}

impl DashboardStats {
    /// Tally `articles` and `subscribers`.
    ///
    /// Featured counts only published articles, matching what readers see.
    pub fn tally(articles: &[Article], subscribers: &[Subscriber]) -> Self {
        let count = |n: usize| u64::try_from(n).unwrap_or(u64::MAX);
        let published = articles.iter().filter(|article| article.published);
        Self {
            total_articles: count(articles.len()),
            published_articles: count(published.clone().count()),
            draft_articles: count(articles.iter().filter(|article| !article.published).count()),
            featured_articles: count(published.filter(|article| article.featured).count()),
            total_views: articles
                .iter()
                .fold(0_u64, |total, article| total.saturating_add(article.views)),
            total_subscribers: count(subscribers.len()),
            active_subscribers: count(subscribers.iter().filter(|sub| sub.active).count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, NewArticle};
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn article(published: bool, featured: bool, views: u64) -> Article {
        let mut article = NewArticle {
            title: "T".to_owned(),
            content: "C".to_owned(),
            excerpt: None,
            category: Category::MatchAnalysis,
            tags: Vec::new(),
            published,
            featured,
            image_url: None,
            published_at: None,
            author: None,
        }
        .into_article(Uuid::new_v4(), Utc::now())
        .expect("valid draft");
        article.views = views;
        article
    }

    #[rstest]
    fn tallies_articles() {
        let articles = [
            article(true, true, 10),
            article(true, false, 5),
            article(false, true, 0),
        ];
        let stats = DashboardStats::tally(&articles, &[]);
        assert_eq!(stats.total_articles, 3);
        assert_eq!(stats.published_articles, 2);
        assert_eq!(stats.draft_articles, 1);
        assert_eq!(stats.featured_articles, 1);
        assert_eq!(stats.total_views, 15);
        assert_eq!(stats.total_subscribers, 0);
    }
}
