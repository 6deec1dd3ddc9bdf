//! Articles: the core publishable record.
//!
//! Public readers only ever see articles with `published == true`. Derived
//! fields (`excerpt` fallback and `read_time`) are computed here so every
//! adapter stores the same values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Error, Patch};

/// Characters of content kept when deriving an excerpt.
pub const EXCERPT_LENGTH: usize = 200;
/// Characters of content read per minute for the read time estimate.
pub const CHARS_PER_MINUTE: usize = 1000;
/// Author recorded when a draft does not name one.
pub const DEFAULT_AUTHOR: &str = "FootballVoice";

/// Editorial category of an article.
///
/// The dashboard's "all" filter is a client concept and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Tactical breakdowns of matches.
    MatchAnalysis,
    /// Profiles of individual players.
    PlayerPortraits,
    /// Transfer market news.
    NewsTransfers,
    /// Forecasts for upcoming fixtures.
    Predictions,
    /// Fictional interviews.
    ImaginaryInterviews,
}

impl Category {
    /// Every persisted category in display order.
    pub const ALL: [Category; 5] = [
        Category::MatchAnalysis,
        Category::PlayerPortraits,
        Category::NewsTransfers,
        Category::Predictions,
        Category::ImaginaryInterviews,
    ];

    /// Wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MatchAnalysis => "match-analysis",
            Self::PlayerPortraits => "player-portraits",
            Self::NewsTransfers => "news-transfers",
            Self::Predictions => "predictions",
            Self::ImaginaryInterviews => "imaginary-interviews",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// A persisted article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Immutable identifier assigned on creation.
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub published: bool,
    pub featured: bool,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Estimated minutes to read, derived from the content length.
    pub read_time: u32,
    /// Public fetch counter; never decreases.
    pub views: u64,
    pub author: String,
}

/// Estimate reading time in whole minutes.
///
/// # Examples
/// ```
/// use footballvoice::domain::estimate_read_time;
///
/// assert_eq!(estimate_read_time(""), 0);
/// assert_eq!(estimate_read_time("C"), 1);
/// assert_eq!(estimate_read_time(&"x".repeat(2001)), 3);
/// ```
pub fn estimate_read_time(content: &str) -> u32 {
    let minutes = content.chars().count().div_ceil(CHARS_PER_MINUTE);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Derive an excerpt from article content.
///
/// Content longer than [`EXCERPT_LENGTH`] characters is cut and suffixed with
/// `...`; shorter content is used whole.
pub fn derive_excerpt(content: &str) -> String {
    let trimmed = content.trim();
    match trimmed.char_indices().nth(EXCERPT_LENGTH) {
        Some((cut, _)) => format!("{}...", trimmed[..cut].trim_end()),
        None => trimmed.to_owned(),
    }
}

fn normalise_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_owned())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn validate_title(title: String) -> Result<String, Error> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_request("title must not be empty")
            .with_details(json!({ "field": "title", "code": "empty_title" })));
    }
    Ok(trimmed.to_owned())
}

fn resolve_excerpt(excerpt: Option<String>, content: &str) -> String {
    match excerpt {
        Some(text) if !text.trim().is_empty() => text,
        _ => derive_excerpt(content),
    }
}

/// Validated input for creating an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category: Category,
    pub tags: Vec<String>,
    pub published: bool,
    pub featured: bool,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub author: Option<String>,
}

impl NewArticle {
    /// Build the persisted record with server-assigned fields.
    ///
    /// Publishing without an explicit `published_at` stamps `now`.
    pub fn into_article(self, id: Uuid, now: DateTime<Utc>) -> Result<Article, Error> {
        let title = validate_title(self.title)?;
        let excerpt = resolve_excerpt(self.excerpt, &self.content);
        let published_at = match (self.published, self.published_at) {
            (_, Some(at)) => Some(at),
            (true, None) => Some(now),
            (false, None) => None,
        };
        let author = self
            .author
            .map(|author| author.trim().to_owned())
            .filter(|author| !author.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_owned());

        Ok(Article {
            id,
            read_time: estimate_read_time(&self.content),
            title,
            content: self.content,
            excerpt,
            category: self.category,
            tags: normalise_tags(self.tags),
            published: self.published,
            featured: self.featured,
            image_url: self.image_url,
            published_at,
            created_at: now,
            updated_at: now,
            views: 0,
            author,
        })
    }
}

/// Sparse article update as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticlePatch {
    pub title: Patch<String>,
    pub content: Patch<String>,
    pub excerpt: Patch<String>,
    pub category: Patch<Category>,
    pub tags: Patch<Vec<String>>,
    pub published: Patch<bool>,
    pub featured: Patch<bool>,
    pub image_url: Patch<String>,
    pub published_at: Patch<DateTime<Utc>>,
    pub author: Patch<String>,
}

impl ArticlePatch {
    fn excerpt_needs_derivation(&self) -> bool {
        match &self.excerpt {
            Patch::Absent => false,
            Patch::Clear => true,
            Patch::Set(text) => text.trim().is_empty(),
        }
    }

    /// Whether resolving this patch needs the stored record.
    ///
    /// True when the excerpt must be re-derived without new content, or when
    /// the article is being published without an explicit timestamp.
    pub fn needs_current(&self) -> bool {
        let derive_from_stored = self.excerpt_needs_derivation() && self.content.is_absent();
        let may_stamp = matches!(self.published, Patch::Set(true)) && self.published_at.is_absent();
        derive_from_stored || may_stamp
    }

    /// Resolve the patch into concrete column changes.
    ///
    /// `current` must be supplied when [`ArticlePatch::needs_current`] is
    /// true; without it a publish leaves `published_at` untouched and a
    /// cleared excerpt derives from the new content only.
    pub fn resolve(
        self,
        current: Option<&Article>,
        now: DateTime<Utc>,
    ) -> Result<ArticleChanges, Error> {
        let derive_excerpt_now = self.excerpt_needs_derivation();
        let title = self.title.required("title")?.map(validate_title).transpose()?;
        let content = self.content.required("content")?;
        let published = self.published.required("published")?;

        let excerpt = if derive_excerpt_now {
            content
                .as_deref()
                .or(current.map(|article| article.content.as_str()))
                .map(derive_excerpt)
        } else {
            self.excerpt.required("excerpt")?
        };

        let published_at = match self.published_at.nullable() {
            Some(value) => Some(value),
            None => match (published, current) {
                (Some(true), Some(article)) if article.published_at.is_none() => Some(Some(now)),
                _ => None,
            },
        };

        Ok(ArticleChanges {
            read_time: content.as_deref().map(estimate_read_time),
            title,
            content,
            excerpt,
            category: self.category.required("category")?,
            tags: self.tags.required("tags")?.map(normalise_tags),
            published,
            featured: self.featured.required("featured")?,
            image_url: self.image_url.nullable(),
            published_at,
            author: self.author.required("author")?,
            updated_at: now,
        })
    }
}

/// Concrete column changes for one article update.
///
/// `None` leaves a column untouched. Nullable columns use a nested option so
/// `Some(None)` clears them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub image_url: Option<Option<String>>,
    pub published_at: Option<Option<DateTime<Utc>>>,
    pub read_time: Option<u32>,
    pub author: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ArticleChanges {
    /// Merge these changes into `article`, leaving untouched fields as they are.
    pub fn apply_to(&self, article: &mut Article) {
        fn merge<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        merge(&mut article.title, &self.title);
        merge(&mut article.content, &self.content);
        merge(&mut article.excerpt, &self.excerpt);
        merge(&mut article.category, &self.category);
        merge(&mut article.tags, &self.tags);
        merge(&mut article.published, &self.published);
        merge(&mut article.featured, &self.featured);
        merge(&mut article.image_url, &self.image_url);
        merge(&mut article.published_at, &self.published_at);
        merge(&mut article.read_time, &self.read_time);
        merge(&mut article.author, &self.author);
        article.updated_at = self.updated_at;
    }
}
