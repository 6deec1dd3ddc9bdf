//! Static pages addressed by slug (`about`, `contact`, ...).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::{Error, Patch};

/// Validation errors raised when parsing a [`PageSlug`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageSlugError {
    #[error("page slug must not be empty")]
    Empty,
    #[error("page slug may only contain lowercase letters, digits, or hyphens")]
    InvalidCharacters,
}

/// Unique key of a page.
///
/// Slugs are non-empty and composed of lowercase ASCII letters, digits and
/// hyphens. Surrounding whitespace is not stripped; it is rejected.
///
/// # Examples
/// ```
/// use footballvoice::domain::PageSlug;
///
/// assert!(PageSlug::new("about").is_ok());
/// assert!(PageSlug::new("About Us").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "about")]
pub struct PageSlug(String);

impl PageSlug {
    /// Validate and construct a slug.
    pub fn new(value: impl Into<String>) -> Result<Self, PageSlugError> {
        let value = value.into();
        if value.is_empty() {
            return Err(PageSlugError::Empty);
        }
        let allowed = value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-');
        if !allowed {
            return Err(PageSlugError::InvalidCharacters);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PageSlug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PageSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PageSlug {
    type Error = PageSlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSlug> for String {
    fn from(value: PageSlug) -> Self {
        value.0
    }
}

/// A static page. `content` is opaque to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub slug: PageSlug,
    pub title: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

/// Sparse page update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagePatch {
    pub title: Patch<String>,
    pub content: Patch<String>,
}

/// Resolved page column changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl PagePatch {
    /// Resolve into column changes; both fields are `NOT NULL`.
    pub fn resolve(self, now: DateTime<Utc>) -> Result<PageChanges, Error> {
        let title = self.title.required("title")?;
        if title.as_deref().is_some_and(|title| title.trim().is_empty()) {
            return Err(Error::invalid_request("title must not be empty")
                .with_details(json!({ "field": "title", "code": "empty_title" })));
        }
        Ok(PageChanges {
            title,
            content: self.content.required("content")?,
            updated_at: now,
        })
    }
}

impl PageChanges {
    pub fn apply_to(&self, page: &mut Page) {
        if let Some(title) = &self.title {
            page.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            page.content.clone_from(content);
        }
        page.updated_at = self.updated_at;
    }
}
