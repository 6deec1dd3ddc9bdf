//! Record cache mirroring the dashboard's list views.
//!
//! The cache holds the most recently fetched list of one resource. Every
//! mutation is followed by a full refetch; there is no retry or backoff. A
//! failed fetch is recorded as [`CacheState::Failed`] so callers can tell it
//! apart from a confirmed empty list, while [`ResourceCache::records`] still
//! yields an empty slice for views that only render rows.

use std::fmt::Display;
use std::future::Future;

use tracing::warn;

/// Lifecycle of a cached list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState<T> {
    Loading,
    Ready(Vec<T>),
    Failed(String),
}

/// Most recently fetched list of one resource.
///
/// # Examples
/// ```
/// use footballvoice::client::ResourceCache;
///
/// # futures::executor::block_on(async {
/// let mut cache = ResourceCache::<u32>::new();
/// assert!(cache.is_loading());
///
/// cache.refresh(|| async { Err::<Vec<u32>, _>("connection refused") }).await;
/// assert!(cache.is_failed());
/// assert!(cache.records().is_empty());
///
/// cache.refresh(|| async { Ok::<_, &str>(vec![1, 2]) }).await;
/// assert_eq!(cache.records(), &[1, 2]);
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCache<T> {
    state: CacheState<T>,
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self {
            state: CacheState::Loading,
        }
    }
}

impl<T> ResourceCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CacheState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, CacheState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, CacheState::Failed(_))
    }

    /// Reason recorded by the last failed fetch.
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            CacheState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Cached rows; empty while loading or after a failed fetch.
    pub fn records(&self) -> &[T] {
        match &self.state {
            CacheState::Ready(records) => records,
            CacheState::Loading | CacheState::Failed(_) => &[],
        }
    }

    /// Replace the cached list with a fresh fetch.
    pub async fn refresh<F, Fut, E>(&mut self, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
        E: Display,
    {
        self.state = CacheState::Loading;
        self.state = match fetch().await {
            Ok(records) => CacheState::Ready(records),
            Err(error) => {
                warn!(%error, "record fetch failed");
                CacheState::Failed(error.to_string())
            }
        };
    }

    /// Run a mutation and refetch the list once it succeeds. A failed
    /// mutation leaves the cache untouched and returns the error.
    pub async fn mutate<M, MFut, R, F, Fut, E>(&mut self, mutation: M, fetch: F) -> Result<R, E>
    where
        M: FnOnce() -> MFut,
        MFut: Future<Output = Result<R, E>>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
        E: Display,
    {
        let outcome = mutation().await?;
        self.refresh(fetch).await;
        Ok(outcome)
    }
}
