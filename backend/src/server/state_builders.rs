//! Builders wiring repositories into domain services and HTTP state.
//!
//! Postgres-backed and in-memory runs share one wiring path: both hand a
//! [`Repositories`] bundle to [`build_http_state`], which is generic over the
//! repository adapters.

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;
use mockable::{Clock, DefaultClock};

use footballvoice::domain::ports::{
    AdminProfileCommand, AdminProfileQuery, AdminRepository, ArticleRepository, ArticlesCommand,
    ArticlesQuery, LoginCodeRepository, LoginService, Mailer, NotificationRepository,
    NotificationsCommand, NotificationsQuery, PageRepository, PagesCommand, PagesQuery,
    SubscriberRepository, SubscribersCommand, SubscribersQuery,
};
use footballvoice::domain::{
    AdminService, ArticleService, DashboardStatsService, NewsletterService, NotificationService,
    PageService, SubscriberService,
};
use footballvoice::inbound::http::state::{HttpState, HttpStatePorts};
use footballvoice::outbound::mailer::TracingMailer;
use footballvoice::outbound::memory::InMemoryStore;
use footballvoice::outbound::persistence::{
    DbPool, DieselAdminRepository, DieselArticleRepository, DieselLoginCodeRepository,
    DieselNotificationRepository, DieselPageRepository, DieselSubscriberRepository,
};

/// One adapter per driven repository port.
pub struct Repositories<Ar, Pg, Su, No, Ad, Lc> {
    pub articles: Arc<Ar>,
    pub pages: Arc<Pg>,
    pub subscribers: Arc<Su>,
    pub notifications: Arc<No>,
    pub admins: Arc<Ad>,
    pub login_codes: Arc<Lc>,
}

/// Diesel adapters sharing one pool.
pub type DieselRepositories = Repositories<
    DieselArticleRepository,
    DieselPageRepository,
    DieselSubscriberRepository,
    DieselNotificationRepository,
    DieselAdminRepository,
    DieselLoginCodeRepository,
>;

/// Every port served by a single in-memory store.
pub type MemoryRepositories = Repositories<
    InMemoryStore,
    InMemoryStore,
    InMemoryStore,
    InMemoryStore,
    InMemoryStore,
    InMemoryStore,
>;

pub fn diesel_repositories(pool: &DbPool) -> DieselRepositories {
    Repositories {
        articles: Arc::new(DieselArticleRepository::new(pool.clone())),
        pages: Arc::new(DieselPageRepository::new(pool.clone())),
        subscribers: Arc::new(DieselSubscriberRepository::new(pool.clone())),
        notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
        admins: Arc::new(DieselAdminRepository::new(pool.clone())),
        login_codes: Arc::new(DieselLoginCodeRepository::new(pool.clone())),
    }
}

pub fn memory_repositories(store: Arc<InMemoryStore>) -> MemoryRepositories {
    Repositories {
        articles: store.clone(),
        pages: store.clone(),
        subscribers: store.clone(),
        notifications: store.clone(),
        admins: store.clone(),
        login_codes: store,
    }
}

/// Runtime inputs shared by every service.
#[derive(Clone)]
pub struct ServiceSettings {
    pub clock: Arc<dyn Clock>,
    pub login_code_ttl: Duration,
}

impl ServiceSettings {
    pub fn new(login_code_ttl: Duration) -> Self {
        Self {
            clock: Arc::new(DefaultClock),
            login_code_ttl,
        }
    }
}

/// Build the HTTP state over the given repositories and mailer.
pub fn build_http_state<Ar, Pg, Su, No, Ad, Lc, M>(
    repos: Repositories<Ar, Pg, Su, No, Ad, Lc>,
    mailer: Arc<M>,
    settings: &ServiceSettings,
) -> web::Data<HttpState>
where
    Ar: ArticleRepository + 'static,
    Pg: PageRepository + 'static,
    Su: SubscriberRepository + 'static,
    No: NotificationRepository + 'static,
    Ad: AdminRepository + 'static,
    Lc: LoginCodeRepository + 'static,
    M: Mailer + 'static,
{
    let clock = settings.clock.clone();
    let articles = Arc::new(ArticleService::new(repos.articles.clone(), clock.clone()));
    let pages = Arc::new(PageService::new(repos.pages, clock.clone()));
    let subscribers = Arc::new(SubscriberService::new(
        repos.subscribers.clone(),
        clock.clone(),
    ));
    let notifications = Arc::new(NotificationService::new(
        repos.notifications.clone(),
        clock.clone(),
    ));
    let newsletters = Arc::new(NewsletterService::new(
        repos.subscribers.clone(),
        repos.notifications,
        mailer.clone(),
        clock.clone(),
    ));
    let admin = Arc::new(
        AdminService::new(repos.admins, repos.login_codes, mailer, clock)
            .with_code_ttl(settings.login_code_ttl),
    );
    let stats = Arc::new(DashboardStatsService::new(repos.articles, repos.subscribers));

    web::Data::new(HttpState::new(HttpStatePorts {
        articles: articles.clone() as Arc<dyn ArticlesQuery>,
        articles_admin: articles as Arc<dyn ArticlesCommand>,
        pages: pages.clone() as Arc<dyn PagesQuery>,
        pages_admin: pages as Arc<dyn PagesCommand>,
        subscribers: subscribers.clone() as Arc<dyn SubscribersCommand>,
        subscribers_query: subscribers as Arc<dyn SubscribersQuery>,
        notifications: notifications.clone() as Arc<dyn NotificationsCommand>,
        notifications_query: notifications as Arc<dyn NotificationsQuery>,
        newsletters,
        login: admin.clone() as Arc<dyn LoginService>,
        profile: admin.clone() as Arc<dyn AdminProfileQuery>,
        profile_admin: admin as Arc<dyn AdminProfileCommand>,
        stats,
    }))
}

/// State for a development run without a database.
pub fn build_memory_state(
    store: Arc<InMemoryStore>,
    settings: &ServiceSettings,
) -> web::Data<HttpState> {
    build_http_state(
        memory_repositories(store),
        Arc::new(TracingMailer),
        settings,
    )
}

/// State backed by PostgreSQL.
pub fn build_diesel_state(pool: &DbPool, settings: &ServiceSettings) -> web::Data<HttpState> {
    build_http_state(
        diesel_repositories(pool),
        Arc::new(TracingMailer),
        settings,
    )
}
