//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::{
    MockAdminProfileCommand, MockAdminProfileQuery, MockArticlesCommand, MockArticlesQuery,
    MockDashboardStatsQuery, MockLoginService, MockNewsletterCommand, MockNotificationsCommand,
    MockNotificationsQuery, MockPagesCommand, MockPagesQuery, MockSubscribersCommand,
    MockSubscribersQuery,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::validation::json_config;
use crate::middleware::{Cors, Trace};

/// Admin id written by [`admin_cookie`].
pub const TEST_ADMIN_ID: Uuid = Uuid::from_u128(0x3fa8_5f64_5717_4562_b3fc_2c96_3f66_afa6);

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// One mock per driving port. Unconfigured mocks panic when called.
#[derive(Default)]
pub struct TestPorts {
    pub articles: MockArticlesQuery,
    pub articles_admin: MockArticlesCommand,
    pub pages: MockPagesQuery,
    pub pages_admin: MockPagesCommand,
    pub subscribers: MockSubscribersCommand,
    pub subscribers_query: MockSubscribersQuery,
    pub notifications: MockNotificationsCommand,
    pub notifications_query: MockNotificationsQuery,
    pub newsletters: MockNewsletterCommand,
    pub login: MockLoginService,
    pub profile: MockAdminProfileQuery,
    pub profile_admin: MockAdminProfileCommand,
    pub stats: MockDashboardStatsQuery,
}

impl TestPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            articles: Arc::new(self.articles),
            articles_admin: Arc::new(self.articles_admin),
            pages: Arc::new(self.pages),
            pages_admin: Arc::new(self.pages_admin),
            subscribers: Arc::new(self.subscribers),
            subscribers_query: Arc::new(self.subscribers_query),
            notifications: Arc::new(self.notifications),
            notifications_query: Arc::new(self.notifications_query),
            newsletters: Arc::new(self.newsletters),
            login: Arc::new(self.login),
            profile: Arc::new(self.profile),
            profile_admin: Arc::new(self.profile_admin),
            stats: Arc::new(self.stats),
        })
    }
}

/// App wired like production, plus `/test/session` which signs in
/// [`TEST_ADMIN_ID`].
pub fn test_app(
    ports: TestPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .app_data(json_config())
        .wrap(test_session_middleware())
        .wrap(Cors)
        .wrap(Trace)
        .route(
            "/test/session",
            web::post().to(|session: SessionContext| async move {
                session.persist_admin(TEST_ADMIN_ID)?;
                Ok::<_, Error>(HttpResponse::NoContent().finish())
            }),
        )
        .service(web::scope("/api").configure(configure_api))
}

/// Sign in through `/test/session` and return the session cookie.
pub async fn admin_cookie<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post().uri("/test/session").to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
