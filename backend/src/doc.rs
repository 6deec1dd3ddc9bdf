//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together
//! with the domain and request schemas they exchange, plus the session cookie
//! security scheme. Swagger UI serves it at `/docs` in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{NewsletterReceipt, NewsletterRequest};
use crate::domain::{
    AdminProfile, Article, Category, DashboardStats, Error, ErrorCode, Frequency, Notification,
    Page, Subscriber, SubscriberPreferences,
};
use crate::inbound::http::admin::{
    LoginCodeRequest, LoginRequest, UpdateProfileRequest, VerifyLoginCodeRequest,
};
use crate::inbound::http::articles::{CreateArticleRequest, MessageResponse, UpdateArticleRequest};
use crate::inbound::http::notifications::AppendNotificationRequest;
use crate::inbound::http::pages::UpdatePageRequest;
use crate::inbound::http::subscribers::{SubscribeRequest, UpdateSubscriberRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/admin/login or /api/admin/login-code/verify.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "FootballVoice API",
        description = "Public article reader, subscriptions and the admin dashboard."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::articles::list_articles,
        crate::inbound::http::articles::get_article,
        crate::inbound::http::articles::admin_list_articles,
        crate::inbound::http::articles::create_article,
        crate::inbound::http::articles::admin_get_article,
        crate::inbound::http::articles::update_article,
        crate::inbound::http::articles::delete_article,
        crate::inbound::http::pages::get_page,
        crate::inbound::http::pages::update_page,
        crate::inbound::http::pages::admin_list_pages,
        crate::inbound::http::subscribers::subscribe,
        crate::inbound::http::subscribers::list_subscribers,
        crate::inbound::http::subscribers::update_subscriber,
        crate::inbound::http::subscribers::delete_subscriber,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::append_notification,
        crate::inbound::http::notifications::send_newsletter,
        crate::inbound::http::admin::login,
        crate::inbound::http::admin::request_login_code,
        crate::inbound::http::admin::verify_login_code,
        crate::inbound::http::admin::logout,
        crate::inbound::http::admin::get_profile,
        crate::inbound::http::admin::update_profile,
        crate::inbound::http::admin::get_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Article,
        Category,
        Page,
        Subscriber,
        SubscriberPreferences,
        Frequency,
        Notification,
        AdminProfile,
        DashboardStats,
        Error,
        ErrorCode,
        MessageResponse,
        CreateArticleRequest,
        UpdateArticleRequest,
        UpdatePageRequest,
        SubscribeRequest,
        UpdateSubscriberRequest,
        AppendNotificationRequest,
        NewsletterRequest,
        NewsletterReceipt,
        LoginRequest,
        LoginCodeRequest,
        VerifyLoginCodeRequest,
        UpdateProfileRequest,
    )),
    tags(
        (name = "articles", description = "Public article reader"),
        (name = "pages", description = "Static pages"),
        (name = "subscribers", description = "Newsletter subscriptions"),
        (name = "auth", description = "Admin sign-in and sign-out"),
        (name = "admin", description = "Admin dashboard operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
