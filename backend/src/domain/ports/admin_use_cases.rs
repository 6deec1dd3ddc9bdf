//! Driving ports for admin authentication, profile, and dashboard.
//!
//! Inbound adapters open a session from the [`AdminProfile`] these ports
//! return; they never see credential digests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AdminProfile, AdminProfilePatch, DashboardStats, EmailAddress, Error, Password};

/// Email and password submitted to the login form.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: EmailAddress,
    pub password: Password,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check a password and return the matching admin.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AdminProfile, Error>;

    /// Issue and mail a one-time code. Unknown emails succeed silently.
    async fn request_login_code(&self, email: &EmailAddress) -> Result<(), Error>;

    /// Redeem a one-time code.
    async fn verify_login_code(&self, email: &EmailAddress, code: &str)
    -> Result<AdminProfile, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminProfileQuery: Send + Sync {
    async fn profile(&self, id: Uuid) -> Result<AdminProfile, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminProfileCommand: Send + Sync {
    async fn update_profile(&self, id: Uuid, patch: AdminProfilePatch)
    -> Result<AdminProfile, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardStatsQuery: Send + Sync {
    async fn stats(&self) -> Result<DashboardStats, Error>;
}
