//! Admin authentication and profile service.
//!
//! Two login paths exist: email and password, or a six digit code mailed to
//! the admin. Codes live in a [`LoginCodeRepository`] with an explicit expiry
//! and are consumed on first successful use.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    AdminProfileCommand, AdminProfileQuery, AdminRepository, AdminRepositoryError,
    LoginCodeRepository, LoginCodeRepositoryError, LoginCredentials, LoginService, Mailer,
    OutgoingEmail,
};
use crate::domain::{
    AdminAccount, AdminProfile, AdminProfilePatch, EmailAddress, Error, LoginCode,
    MAX_LOGIN_CODE_ATTEMPTS, SecretDigest, validate_password,
};

/// Default lifetime of a mailed login code, in seconds.
pub const DEFAULT_LOGIN_CODE_TTL_SECS: i64 = 600;

const BAD_CREDENTIALS: &str = "Invalid email or password";
const BAD_CODE: &str = "Invalid or expired login code";

fn map_admin_error(error: AdminRepositoryError) -> Error {
    match error {
        AdminRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("admin repository unavailable: {message}"))
        }
        AdminRepositoryError::Query { message } => {
            Error::internal(format!("admin repository error: {message}"))
        }
        AdminRepositoryError::EmailTaken { .. } => Error::conflict("Email already in use")
            .with_details(json!({ "field": "email", "code": "email_taken" })),
        AdminRepositoryError::CorruptCredential { message } => {
            Error::internal(format!("admin credential unreadable: {message}"))
        }
    }
}

fn map_login_code_error(error: LoginCodeRepositoryError) -> Error {
    match error {
        LoginCodeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("login code repository unavailable: {message}"))
        }
        LoginCodeRepositoryError::Query { message } => {
            Error::internal(format!("login code repository error: {message}"))
        }
    }
}

/// Admin service over account and login code storage plus a mailer.
#[derive(Clone)]
pub struct AdminService<A, L, M> {
    admins: Arc<A>,
    codes: Arc<L>,
    mailer: Arc<M>,
    clock: Arc<dyn Clock>,
    code_ttl: Duration,
}

impl<A, L, M> AdminService<A, L, M> {
    pub fn new(admins: Arc<A>, codes: Arc<L>, mailer: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            admins,
            codes,
            mailer,
            clock,
            code_ttl: Duration::seconds(DEFAULT_LOGIN_CODE_TTL_SECS),
        }
    }

    /// Override how long mailed login codes stay valid.
    #[must_use]
    pub fn with_code_ttl(mut self, code_ttl: Duration) -> Self {
        self.code_ttl = code_ttl;
        self
    }
}

impl<A, L, M> AdminService<A, L, M>
where
    A: AdminRepository,
{
    /// Create an admin account. Used by provisioning tools, not exposed over HTTP.
    pub async fn provision(
        &self,
        name: &str,
        email: EmailAddress,
        password: &str,
    ) -> Result<AdminProfile, Error> {
        if name.trim().is_empty() {
            return Err(Error::invalid_request("name must not be empty"));
        }
        validate_password(password)?;
        let account = AdminAccount {
            profile: AdminProfile {
                id: Uuid::new_v4(),
                name: name.trim().to_owned(),
                email,
            },
            password: SecretDigest::derive(password),
        };
        self.admins.insert(&account).await.map_err(map_admin_error)?;
        info!(admin_id = %account.profile.id, "admin provisioned");
        Ok(account.profile)
    }
}

#[async_trait]
impl<A, L, M> LoginService for AdminService<A, L, M>
where
    A: AdminRepository,
    L: LoginCodeRepository,
    M: Mailer,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AdminProfile, Error> {
        let account = self
            .admins
            .find_by_email(&credentials.email)
            .await
            .map_err(map_admin_error)?;
        match account {
            Some(account) if account.password.verify(&credentials.password) => {
                info!(admin_id = %account.profile.id, "admin logged in with password");
                Ok(account.profile)
            }
            _ => Err(Error::unauthorized(BAD_CREDENTIALS)),
        }
    }

    async fn request_login_code(&self, email: &EmailAddress) -> Result<(), Error> {
        let account = self
            .admins
            .find_by_email(email)
            .await
            .map_err(map_admin_error)?;
        let Some(account) = account else {
            info!("login code requested for unknown email");
            return Ok(());
        };

        let (record, code) = LoginCode::issue(email.clone(), self.clock.utc(), self.code_ttl);
        self.codes
            .replace(&record)
            .await
            .map_err(map_login_code_error)?;

        let message = OutgoingEmail {
            to: email.clone(),
            subject: "Your FootballVoice login code".to_owned(),
            body: format!(
                "Your login code is {}. It expires in {} minutes.",
                code.as_str(),
                self.code_ttl.num_minutes()
            ),
        };
        self.mailer.send(&message).await.map_err(|err| {
            warn!(admin_id = %account.profile.id, error = %err, "login code delivery failed");
            Error::internal(format!("login code delivery failed: {err}"))
        })?;
        info!(admin_id = %account.profile.id, "login code issued");
        Ok(())
    }

    async fn verify_login_code(
        &self,
        email: &EmailAddress,
        code: &str,
    ) -> Result<AdminProfile, Error> {
        let now = self.clock.utc();
        let pending = self.codes.find(email).await.map_err(map_login_code_error)?;
        let Some(pending) = pending else {
            return Err(Error::unauthorized(BAD_CODE));
        };
        if pending.is_expired(now) || pending.is_exhausted() {
            self.codes.consume(email).await.map_err(map_login_code_error)?;
            return Err(Error::unauthorized(BAD_CODE));
        }
        if !pending.accepts(code, now) {
            let attempts = self
                .codes
                .record_failure(email)
                .await
                .map_err(map_login_code_error)?;
            if attempts.is_some_and(|count| count >= MAX_LOGIN_CODE_ATTEMPTS) {
                self.codes.consume(email).await.map_err(map_login_code_error)?;
                warn!("login code discarded after repeated wrong guesses");
            }
            return Err(Error::unauthorized(BAD_CODE));
        }
        // A concurrent verify may have redeemed the same code first.
        if !self.codes.consume(email).await.map_err(map_login_code_error)? {
            return Err(Error::unauthorized(BAD_CODE));
        }

        let account = self
            .admins
            .find_by_email(email)
            .await
            .map_err(map_admin_error)?
            .ok_or_else(|| Error::unauthorized(BAD_CODE))?;
        info!(admin_id = %account.profile.id, "admin logged in with code");
        Ok(account.profile)
    }
}

#[async_trait]
impl<A, L, M> AdminProfileQuery for AdminService<A, L, M>
where
    A: AdminRepository,
    L: Send + Sync,
    M: Send + Sync,
{
    async fn profile(&self, id: Uuid) -> Result<AdminProfile, Error> {
        self.admins
            .find_by_id(id)
            .await
            .map_err(map_admin_error)?
            .map(|account| account.profile)
            .ok_or_else(|| Error::not_found("Admin not found"))
    }
}

#[async_trait]
impl<A, L, M> AdminProfileCommand for AdminService<A, L, M>
where
    A: AdminRepository,
    L: Send + Sync,
    M: Send + Sync,
{
    async fn update_profile(
        &self,
        id: Uuid,
        patch: AdminProfilePatch,
    ) -> Result<AdminProfile, Error> {
        let changes = patch.resolve()?;
        self.admins
            .update(id, &changes)
            .await
            .map_err(map_admin_error)?
            .map(|account| account.profile)
            .ok_or_else(|| Error::not_found("Admin not found"))
    }
}
