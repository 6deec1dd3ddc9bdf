//! Newsletter subscribers and their delivery preferences.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Category, Error, Patch};

/// Validation errors raised when parsing an [`EmailAddress`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailAddressError {
    #[error("email must not be empty")]
    Empty,
    #[error("email must contain a single @ between a local part and a domain")]
    Malformed,
}

/// Normalised email address: trimmed and lowercased.
///
/// # Examples
/// ```
/// use footballvoice::domain::EmailAddress;
///
/// let email = EmailAddress::parse("  Fan@Example.com ").expect("valid email");
/// assert_eq!(email.as_str(), "fan@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "fan@example.com")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate `raw`.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, EmailAddressError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(EmailAddressError::Empty);
        }
        let mut parts = normalised.split('@');
        let well_formed = match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) => {
                !local.is_empty() && !domain.is_empty() && !normalised.contains(char::is_whitespace)
            }
            _ => false,
        };
        if !well_formed {
            return Err(EmailAddressError::Malformed);
        }
        Ok(Self(normalised))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl From<EmailAddressError> for Error {
    fn from(err: EmailAddressError) -> Self {
        Error::invalid_request(err.to_string())
            .with_details(serde_json::json!({ "field": "email", "code": "invalid_email" }))
    }
}

/// How often a subscriber wants to hear from us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(Error::internal(format!("unknown stored frequency: {other}"))),
        }
    }
}

/// Delivery preferences of a subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriberPreferences {
    /// Categories of interest; empty means every category.
    pub categories: Vec<Category>,
    pub frequency: Frequency,
}

impl SubscriberPreferences {
    /// Whether a newsletter about `category` should reach this subscriber.
    pub fn wants(&self, category: Option<Category>) -> bool {
        match category {
            None => true,
            Some(category) => self.categories.is_empty() || self.categories.contains(&category),
        }
    }
}

/// A persisted subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: Uuid,
    pub email: EmailAddress,
    pub name: Option<String>,
    pub subscribed_at: DateTime<Utc>,
    pub active: bool,
    pub preferences: SubscriberPreferences,
}

/// Validated subscription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscriber {
    pub email: EmailAddress,
    pub name: Option<String>,
    pub preferences: SubscriberPreferences,
}

impl NewSubscriber {
    pub fn into_subscriber(self, id: Uuid, now: DateTime<Utc>) -> Subscriber {
        Subscriber {
            id,
            email: self.email,
            name: self.name.filter(|name| !name.trim().is_empty()),
            subscribed_at: now,
            active: true,
            preferences: self.preferences,
        }
    }
}

/// Outcome of a subscription attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subscription {
    Created(Subscriber),
    AlreadySubscribed,
}

/// Sparse subscriber update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberPatch {
    pub name: Patch<String>,
    pub active: Patch<bool>,
    pub preferences: Patch<SubscriberPreferences>,
}

/// Resolved subscriber column changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberChanges {
    pub name: Option<Option<String>>,
    pub active: Option<bool>,
    pub preferences: Option<SubscriberPreferences>,
}

impl SubscriberPatch {
    pub fn resolve(self) -> Result<SubscriberChanges, Error> {
        Ok(SubscriberChanges {
            name: self.name.nullable(),
            active: self.active.required("active")?,
            preferences: self.preferences.required("preferences")?,
        })
    }
}

impl SubscriberChanges {
    /// `true` when no column would be touched.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.active.is_none() && self.preferences.is_none()
    }

    pub fn apply_to(&self, subscriber: &mut Subscriber) {
        if let Some(name) = &self.name {
            subscriber.name.clone_from(name);
        }
        if let Some(active) = self.active {
            subscriber.active = active;
        }
        if let Some(preferences) = &self.preferences {
            subscriber.preferences.clone_from(preferences);
        }
    }
}
