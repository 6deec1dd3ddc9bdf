//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AdminProfileCommand, AdminProfileQuery, ArticlesCommand, ArticlesQuery, DashboardStatsQuery,
    LoginService, NewsletterCommand, NotificationsCommand, NotificationsQuery, PagesCommand,
    PagesQuery, SubscribersCommand, SubscribersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub articles: Arc<dyn ArticlesQuery>,
    pub articles_admin: Arc<dyn ArticlesCommand>,
    pub pages: Arc<dyn PagesQuery>,
    pub pages_admin: Arc<dyn PagesCommand>,
    pub subscribers: Arc<dyn SubscribersCommand>,
    pub subscribers_query: Arc<dyn SubscribersQuery>,
    pub notifications: Arc<dyn NotificationsCommand>,
    pub notifications_query: Arc<dyn NotificationsQuery>,
    pub newsletters: Arc<dyn NewsletterCommand>,
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn AdminProfileQuery>,
    pub profile_admin: Arc<dyn AdminProfileCommand>,
    pub stats: Arc<dyn DashboardStatsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub articles: Arc<dyn ArticlesQuery>,
    pub articles_admin: Arc<dyn ArticlesCommand>,
    pub pages: Arc<dyn PagesQuery>,
    pub pages_admin: Arc<dyn PagesCommand>,
    pub subscribers: Arc<dyn SubscribersCommand>,
    pub subscribers_query: Arc<dyn SubscribersQuery>,
    pub notifications: Arc<dyn NotificationsCommand>,
    pub notifications_query: Arc<dyn NotificationsQuery>,
    pub newsletters: Arc<dyn NewsletterCommand>,
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn AdminProfileQuery>,
    pub profile_admin: Arc<dyn AdminProfileCommand>,
    pub stats: Arc<dyn DashboardStatsQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            articles,
            articles_admin,
            pages,
            pages_admin,
            subscribers,
            subscribers_query,
            notifications,
            notifications_query,
            newsletters,
            login,
            profile,
            profile_admin,
            stats,
        } = ports;
        Self {
            articles,
            articles_admin,
            pages,
            pages_admin,
            subscribers,
            subscribers_query,
            notifications,
            notifications_query,
            newsletters,
            login,
            profile,
            profile_admin,
            stats,
        }
    }
}
