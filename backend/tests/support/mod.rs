//! Shared harness for HTTP scenario tests.
//!
//! Builds the production route table over an [`InMemoryStore`] with a
//! recording mailer and a settable clock, and provisions one admin account.
#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite, time::Duration as CookieDuration};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};

use footballvoice::domain::ports::{Mailer, MailerError, OutgoingEmail};
use footballvoice::domain::{AdminProfile, AdminService, EmailAddress};
use footballvoice::inbound::http::configure_api;
use footballvoice::inbound::http::health::{self, HealthState};
use footballvoice::inbound::http::state::HttpState;
use footballvoice::inbound::http::validation::json_config;
use footballvoice::middleware::{Cors, Trace};
use footballvoice::outbound::memory::InMemoryStore;

#[path = "../../src/server/state_builders.rs"]
mod state_builders;

use state_builders::{ServiceSettings, build_http_state, memory_repositories};

pub const ADMIN_NAME: &str = "Editor";
pub const ADMIN_EMAIL: &str = "editor@footballvoice.test";
pub const ADMIN_PASSWORD: &str = "offside-trap-42";
pub const CODE_TTL_SECS: i64 = 600;

/// Clock whose time only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().expect("clock mutex");
        *now += by;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock mutex")
    }
}

/// Mailer that keeps every message for inspection.
#[derive(Default)]
pub struct RecordingMailer(Mutex<Vec<OutgoingEmail>>);

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.0.lock().expect("mailer mutex").clone()
    }

    /// Six digit code from the most recent login-code email.
    pub fn last_login_code(&self) -> Option<String> {
        self.sent().iter().rev().find_map(|email| {
            let (_, rest) = email.body.split_once("code is ")?;
            Some(rest.chars().take_while(char::is_ascii_digit).collect())
        })
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        self.0.lock().expect("mailer mutex").push(email.clone());
        Ok(())
    }
}

/// Everything a scenario needs to drive and inspect the service.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub clock: Arc<MutableClock>,
    pub state: web::Data<HttpState>,
    pub health: web::Data<HealthState>,
    pub key: Key,
    pub admin: AdminProfile,
}

impl Harness {
    pub async fn new() -> Self {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).single().expect("valid time");
        let store = Arc::new(InMemoryStore::seeded(now));
        let mailer = Arc::new(RecordingMailer::default());
        let clock = Arc::new(MutableClock::new(now));
        let settings = ServiceSettings {
            clock: clock.clone(),
            login_code_ttl: Duration::seconds(CODE_TTL_SECS),
        };
        let admin = AdminService::new(store.clone(), store.clone(), mailer.clone(), clock.clone())
            .provision(
                ADMIN_NAME,
                EmailAddress::parse(ADMIN_EMAIL).expect("valid email"),
                ADMIN_PASSWORD,
            )
            .await
            .expect("admin provisioned");
        let state = build_http_state(memory_repositories(store.clone()), mailer.clone(), &settings);
        let health = web::Data::new(HealthState::new());
        health.mark_ready();

        Self {
            store,
            mailer,
            clock,
            state,
            health,
            key: Key::generate(),
            admin,
        }
    }

    /// App wired the way the server wires it, with a non-secure cookie.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        build_app(self.state.clone(), self.health.clone(), self.key.clone())
    }
}

pub fn build_app(
    state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
    key: Key,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::hours(2)))
        .build();

    App::new()
        .app_data(state)
        .app_data(health_state)
        .app_data(json_config())
        .wrap(session)
        .wrap(Cors)
        .wrap(Trace)
        .service(web::scope("/api").configure(configure_api))
        .configure(health::configure)
}

pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Sign in with the provisioned admin's password.
pub async fn sign_in<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/admin/login")
            .set_json(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    session_cookie(&res).expect("session cookie")
}

/// Send a JSON request and return status plus parsed body (`Null` if empty).
pub async fn send_json<S, B>(
    app: &S,
    request: test::TestRequest,
) -> (actix_web::http::StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, request.to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}
