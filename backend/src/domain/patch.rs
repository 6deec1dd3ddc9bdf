//! Three-state field updates for partial record merges.
//!
//! A JSON body distinguishes a field that is missing from one that is sent as
//! `null`. [`Patch`] keeps that distinction so a merge only touches fields the
//! caller actually named:
//!
//! | JSON            | `Patch`      | merge effect          |
//! |-----------------|--------------|-----------------------|
//! | field missing   | `Absent`     | stored value kept     |
//! | `"field": null` | `Clear`      | column set to `NULL`  |
//! | `"field": v`    | `Set(v)`     | column overwritten    |
//!
//! Request structs mark every `Patch` field with `#[serde(default)]` so a
//! missing key deserialises to [`Patch::Absent`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::json;

use super::Error;

/// Sparse update for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Field omitted; keep the stored value.
    #[default]
    Absent,
    /// Field explicitly `null`; clear the stored value.
    Clear,
    /// Field supplied; overwrite the stored value.
    Set(T),
}

impl<T> Patch<T> {
    /// `true` when the field was omitted.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Borrow the supplied value.
    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Self::Absent => Patch::Absent,
            Self::Clear => Patch::Clear,
            Self::Set(value) => Patch::Set(value),
        }
    }

    /// Map the supplied value, preserving absence and clearing.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Absent => Patch::Absent,
            Self::Clear => Patch::Clear,
            Self::Set(value) => Patch::Set(f(value)),
        }
    }

    /// Fallible variant of [`Patch::map`].
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        Ok(match self {
            Self::Absent => Patch::Absent,
            Self::Clear => Patch::Clear,
            Self::Set(value) => Patch::Set(f(value)?),
        })
    }

    /// Resolve a field backed by a `NOT NULL` column.
    ///
    /// `Clear` is rejected with an `invalid_request` error naming `field`.
    ///
    /// # Examples
    /// ```
    /// use footballvoice::domain::Patch;
    ///
    /// assert_eq!(Patch::Set(3).required("readTime").unwrap(), Some(3));
    /// assert_eq!(Patch::<u32>::Absent.required("readTime").unwrap(), None);
    /// assert!(Patch::<u32>::Clear.required("readTime").is_err());
    /// ```
    pub fn required(self, field: &'static str) -> Result<Option<T>, Error> {
        match self {
            Self::Absent => Ok(None),
            Self::Set(value) => Ok(Some(value)),
            Self::Clear => Err(Error::invalid_request(format!("{field} cannot be null"))
                .with_details(json!({ "field": field, "code": "null_not_allowed" }))),
        }
    }

    /// Resolve a field backed by a nullable column.
    ///
    /// The outer `Option` says whether to touch the column, the inner one is
    /// the new value.
    pub fn nullable(self) -> Option<Option<T>> {
        match self {
            Self::Absent => None,
            Self::Clear => Some(None),
            Self::Set(value) => Some(Some(value)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Clear, Self::Set)
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Set(value) => serializer.serialize_some(value),
            Self::Absent | Self::Clear => serializer.serialize_none(),
        }
    }
}
