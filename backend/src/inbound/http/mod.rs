//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every content route lives under `/api`; [`configure_api`] registers them
//! relative to that scope. Health probes are mounted separately at the root.

use actix_web::web;

pub mod admin;
pub mod articles;
pub mod error;
pub mod health;
pub mod notifications;
pub mod pages;
pub mod session;
pub mod state;
pub mod subscribers;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register all `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(articles::configure)
        .configure(pages::configure)
        .configure(subscribers::configure)
        .configure(notifications::configure)
        .configure(admin::configure);
}
