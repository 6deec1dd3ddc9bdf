//! Ports for admin accounts and their pending login codes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AdminAccount, AdminChanges, EmailAddress, LoginCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised by admin repository adapters.
    pub enum AdminRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "admin repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "admin repository query failed: {message}",
        /// Another admin already uses the email.
        EmailTaken { email: String } =>
            "admin email already registered: {email}",
        /// A stored secret digest could not be parsed.
        CorruptCredential { message: String } =>
            "admin credential is corrupt: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<AdminAccount>, AdminRepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>, AdminRepositoryError>;

    async fn insert(&self, account: &AdminAccount) -> Result<(), AdminRepositoryError>;

    async fn update(
        &self,
        id: Uuid,
        changes: &AdminChanges,
    ) -> Result<Option<AdminAccount>, AdminRepositoryError>;
}

define_port_error! {
    /// Errors raised by login code repository adapters.
    pub enum LoginCodeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "login code repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "login code repository query failed: {message}",
    }
}

/// Durable store of pending one-time login codes, one per email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginCodeRepository: Send + Sync {
    /// Store `code`, replacing any pending code for the same email.
    async fn replace(&self, code: &LoginCode) -> Result<(), LoginCodeRepositoryError>;

    async fn find(&self, email: &EmailAddress)
    -> Result<Option<LoginCode>, LoginCodeRepositoryError>;

    /// Count one wrong guess against the pending code and return the new
    /// total, or `None` when no code is pending.
    async fn record_failure(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<u32>, LoginCodeRepositoryError>;

    /// Remove the pending code; returns `false` when none existed.
    async fn consume(&self, email: &EmailAddress) -> Result<bool, LoginCodeRepositoryError>;
}
