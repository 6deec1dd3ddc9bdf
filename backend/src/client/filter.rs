//! Local filtering of cached articles for the dashboard list.

use std::str::FromStr;

use crate::domain::{Article, Category, UnknownCategory};

/// Category selector. `All` is a client concept and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    One(Category),
}

impl CategoryFilter {
    fn admits(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::One(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            other => other.parse().map(Self::One),
        }
    }
}

/// Publish-state selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Published,
    Draft,
}

impl StatusFilter {
    fn admits(self, published: bool) -> bool {
        match self {
            Self::All => true,
            Self::Published => published,
            Self::Draft => !published,
        }
    }
}

/// Search term, category and status applied to an in-memory article list.
///
/// # Examples
/// ```
/// use footballvoice::client::{ArticleFilter, StatusFilter};
///
/// let filter = ArticleFilter::default()
///     .with_search("derby")
///     .with_status(StatusFilter::Draft);
/// assert_eq!(filter.search(), "derby");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    search: String,
    category: CategoryFilter,
    status: StatusFilter,
}

impl ArticleFilter {
    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// True when the article passes all three selectors. The search term is
    /// matched case-insensitively against title, excerpt and tags; a blank
    /// term matches everything.
    pub fn matches(&self, article: &Article) -> bool {
        self.category.admits(article.category)
            && self.status.admits(article.published)
            && matches_term(article, &self.search.trim().to_lowercase())
    }

    /// Borrow the matching articles, keeping their order.
    pub fn apply<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        articles.iter().filter(|article| self.matches(article)).collect()
    }
}

fn matches_term(article: &Article, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    article.title.to_lowercase().contains(term)
        || article.excerpt.to_lowercase().contains(term)
        || article
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(term))
}
