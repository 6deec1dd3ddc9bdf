//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Admin endpoints take an [`AdminSession`] argument; extraction fails with
//! `401 Unauthorized` when the cookie carries no admin id.

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::domain::Error;

pub(crate) const ADMIN_ID_KEY: &str = "admin_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated admin's id in the session cookie.
    pub fn persist_admin(&self, admin_id: Uuid) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ADMIN_ID_KEY, admin_id)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current admin id from the session, if present.
    pub fn admin_id(&self) -> Result<Option<Uuid>, Error> {
        match self.0.get::<Uuid>(ADMIN_ID_KEY) {
            Ok(id) => Ok(id),
            Err(error) => {
                tracing::warn!("invalid admin id in session cookie: {error}");
                Ok(None)
            }
        }
    }

    /// Require an authenticated admin or return `401 Unauthorized`.
    pub fn require_admin(&self) -> Result<Uuid, Error> {
        self.admin_id()?
            .ok_or_else(|| Error::unauthorized("Admin session required"))
    }

    /// Drop all session state.
    pub fn end(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::new(req.get_session())))
    }
}

/// Extractor proving the request carries an admin session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminSession {
    pub admin_id: Uuid,
}

impl FromRequest for AdminSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let context = SessionContext::new(req.get_session());
        ready(context.require_admin().map(|admin_id| Self { admin_id }))
    }
}
