//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, load_settings};
pub use state_builders::ServiceSettings;

use std::net::SocketAddr;
use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};

use footballvoice::inbound::http::configure_api;
use footballvoice::inbound::http::health::{self, HealthState};
use footballvoice::inbound::http::state::HttpState;
use footballvoice::inbound::http::validation::json_config;
use footballvoice::middleware::{Cors, Trace};
use footballvoice::outbound::memory::InMemoryStore;
use footballvoice::outbound::persistence::{DbPool, run_pending_migrations};
use state_builders::{build_diesel_state, build_memory_state};
#[cfg(debug_assertions)]
use footballvoice::doc::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Everything needed to start the HTTP server.
pub struct ServerConfig {
    key: Key,
    cookie_secure: bool,
    bind_addr: SocketAddr,
    http_state: web::Data<HttpState>,
}

impl ServerConfig {
    /// Resolve settings into a runnable configuration, connecting to and
    /// migrating the database when one is configured.
    pub async fn from_settings(settings: &AppSettings) -> Result<Self> {
        let service_settings = ServiceSettings::new(settings.login_code_ttl()?);
        let http_state = match settings.pool_config() {
            Some(pool_config) => {
                if settings.run_migrations {
                    let applied = run_pending_migrations(pool_config.database_url())
                        .await
                        .wrap_err("database migration failed")?;
                    info!(applied, "database schema up to date");
                }
                let pool = DbPool::new(pool_config)
                    .await
                    .wrap_err("database pool setup failed")?;
                build_diesel_state(&pool, &service_settings)
            }
            None => {
                warn!("no database configured; content is kept in memory only");
                let store = Arc::new(InMemoryStore::seeded(Utc::now()));
                build_memory_state(store, &service_settings)
            }
        };

        Ok(Self {
            key: settings.session_key()?,
            cookie_secure: settings.cookie_secure,
            bind_addr: settings.bind_addr()?,
            http_state,
        })
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(session)
        .wrap(Cors)
        .wrap(Trace)
        .service(web::scope("/api").configure(configure_api))
        .configure(health::configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server and mark it ready once bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        bind_addr,
        http_state,
    } = config;
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        key,
        cookie_secure,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
