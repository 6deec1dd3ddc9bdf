//! Typed client modelling the admin dashboard's record cache.
//!
//! [`ApiClient`] talks to the HTTP API, [`ResourceCache`] keeps the last
//! fetched list and the boards combine the two with refetch-after-mutation.

pub mod api;
pub mod board;
pub mod cache;
pub mod filter;

pub use api::{ApiClient, ClientError};
pub use board::{ArticleBoard, SubscriberBoard};
pub use cache::{CacheState, ResourceCache};
pub use filter::{ArticleFilter, CategoryFilter, StatusFilter};
