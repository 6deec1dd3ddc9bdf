//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the publishing model (articles, pages, subscribers,
//! notifications, admins) and the services that enforce its invariants.
//! Types here are transport agnostic; adapters live in `inbound` and
//! `outbound`.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: API error payload and stable identifiers.
//! - [`Patch`]: three-state field update used by every partial merge.
//! - Entities: [`Article`], [`Page`], [`Subscriber`], [`Notification`],
//!   [`AdminProfile`].
//! - Services implementing the driving ports in [`ports`].

pub mod admin;
pub mod admin_service;
pub mod article;
pub mod article_service;
pub mod credentials;
pub mod error;
pub mod notification;
pub mod notification_service;
pub mod page;
pub mod page_service;
pub mod patch;
pub mod ports;
pub mod stats;
pub mod stats_service;
pub mod subscriber;
pub mod subscriber_service;
pub mod trace_id;

pub use self::admin::{
    AdminAccount, AdminChanges, AdminProfile, AdminProfilePatch, LoginCode,
    MAX_LOGIN_CODE_ATTEMPTS, PASSWORD_MIN, Password, validate_password,
};
pub use self::admin_service::{AdminService, DEFAULT_LOGIN_CODE_TTL_SECS};
pub use self::article::{
    Article, ArticleChanges, ArticlePatch, Category, DEFAULT_AUTHOR, NewArticle, UnknownCategory,
    derive_excerpt, estimate_read_time,
};
pub use self::article_service::ArticleService;
pub use self::credentials::{MalformedDigest, SecretDigest, generate_login_code};
pub use self::error::{Error, ErrorCode};
pub use self::notification::{NewNotification, Notification};
pub use self::notification_service::{NewsletterService, NotificationService};
pub use self::page::{Page, PageChanges, PagePatch, PageSlug, PageSlugError};
pub use self::page_service::PageService;
pub use self::patch::Patch;
pub use self::stats::DashboardStats;
pub use self::stats_service::DashboardStatsService;
pub use self::subscriber::{
    EmailAddress, EmailAddressError, Frequency, NewSubscriber, Subscriber, SubscriberChanges,
    SubscriberPatch, SubscriberPreferences, Subscription,
};
pub use self::subscriber_service::SubscriberService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use footballvoice::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("Admin session required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
