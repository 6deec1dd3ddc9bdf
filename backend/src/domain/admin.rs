//! Admin identity, credentials, and login codes.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{EmailAddress, Error, Patch, SecretDigest, generate_login_code};

/// Minimum length accepted for a new admin password.
pub const PASSWORD_MIN: usize = 8;

/// Wrong guesses tolerated before a pending login code is discarded.
pub const MAX_LOGIN_CODE_ATTEMPTS: u32 = 5;

/// Public view of an admin. Never carries the password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: Uuid,
    pub name: String,
    pub email: EmailAddress,
}

/// Stored admin record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub profile: AdminProfile,
    pub password: SecretDigest,
}

/// Plaintext password held only as long as needed.
pub type Password = Zeroizing<String>;

/// Check a new password before it is digested.
pub fn validate_password(password: &str) -> Result<(), Error> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(
            Error::invalid_request(format!("password must be at least {PASSWORD_MIN} characters"))
                .with_details(json!({ "field": "password", "code": "password_too_short" })),
        );
    }
    Ok(())
}

/// Sparse admin profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminProfilePatch {
    pub name: Patch<String>,
    pub email: Patch<String>,
    pub password: Patch<Password>,
}

/// Resolved admin column changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminChanges {
    pub name: Option<String>,
    pub email: Option<EmailAddress>,
    pub password: Option<SecretDigest>,
}

impl AdminProfilePatch {
    pub fn resolve(self) -> Result<AdminChanges, Error> {
        let name = self.name.required("name")?;
        if name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(Error::invalid_request("name must not be empty")
                .with_details(json!({ "field": "name", "code": "empty_name" })));
        }
        let email = self
            .email
            .required("email")?
            .map(EmailAddress::parse)
            .transpose()?;
        let password = match self.password.required("password")? {
            Some(password) => {
                validate_password(&password)?;
                Some(SecretDigest::derive(&password))
            }
            None => None,
        };
        Ok(AdminChanges {
            name: name.map(|name| name.trim().to_owned()),
            email,
            password,
        })
    }
}

impl AdminChanges {
    pub fn apply_to(&self, account: &mut AdminAccount) {
        if let Some(name) = &self.name {
            account.profile.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            account.profile.email = email.clone();
        }
        if let Some(password) = &self.password {
            account.password = password.clone();
        }
    }
}

/// Pending one-time login code for an admin email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCode {
    pub email: EmailAddress,
    pub digest: SecretDigest,
    pub expires_at: DateTime<Utc>,
    /// Wrong guesses recorded against this code so far.
    pub failed_attempts: u32,
}

impl LoginCode {
    /// Issue a fresh code; returns the record to store and the plaintext to mail.
    pub fn issue(email: EmailAddress, now: DateTime<Utc>, ttl: Duration) -> (Self, Password) {
        let code = generate_login_code();
        let record = Self {
            email,
            digest: SecretDigest::derive(&code),
            expires_at: now + ttl,
            failed_attempts: 0,
        };
        (record, code)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_exhausted(&self) -> bool {
        self.failed_attempts >= MAX_LOGIN_CODE_ATTEMPTS
    }

    /// Whether `candidate` matches and the code is still valid at `now`.
    pub fn accepts(&self, candidate: &str, now: DateTime<Utc>) -> bool {
        !self.is_expired(now) && !self.is_exhausted() && self.digest.verify(candidate.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn account() -> AdminAccount {
        AdminAccount {
            profile: AdminProfile {
                id: Uuid::nil(),
                name: "Editor".to_owned(),
                email: EmailAddress::parse("editor@footballvoice.test").expect("email"),
            },
            password: SecretDigest::derive("correct horse"),
        }
    }

    #[rstest]
    fn password_change_replaces_digest(mut account: AdminAccount) {
        let changes = AdminProfilePatch {
            password: Patch::Set(Zeroizing::new("battery staple".to_owned())),
            ..AdminProfilePatch::default()
        }
        .resolve()
        .expect("valid patch");
        changes.apply_to(&mut account);
        assert!(account.password.verify("battery staple"));
        assert!(!account.password.verify("correct horse"));
        assert_eq!(account.profile.name, "Editor");
    }

    #[rstest]
    fn short_password_is_rejected() {
        let err = AdminProfilePatch {
            password: Patch::Set(Zeroizing::new("short".to_owned())),
            ..AdminProfilePatch::default()
        }
        .resolve()
        .expect_err("short password");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn email_is_normalised(mut account: AdminAccount) {
        let changes = AdminProfilePatch {
            email: Patch::Set(" Chief@FootballVoice.test ".to_owned()),
            ..AdminProfilePatch::default()
        }
        .resolve()
        .expect("valid patch");
        changes.apply_to(&mut account);
        assert_eq!(account.profile.email.as_str(), "chief@footballvoice.test");
    }

    #[rstest]
    #[case::name(AdminProfilePatch { name: Patch::Clear, ..AdminProfilePatch::default() })]
    #[case::email(AdminProfilePatch { email: Patch::Clear, ..AdminProfilePatch::default() })]
    #[case::password(AdminProfilePatch { password: Patch::Clear, ..AdminProfilePatch::default() })]
    fn null_fields_are_rejected(#[case] patch: AdminProfilePatch) {
        assert!(patch.resolve().is_err());
    }

    #[rstest]
    fn login_code_expires() {
        let now = Utc::now();
        let email = EmailAddress::parse("editor@footballvoice.test").expect("email");
        let (record, code) = LoginCode::issue(email, now, Duration::minutes(10));
        assert!(record.accepts(&code, now + Duration::minutes(9)));
        assert!(!record.accepts(&code, now + Duration::minutes(10)));
        assert!(!record.accepts("not-a-code", now));
    }

    #[rstest]
    #[case(0, true)]
    #[case(MAX_LOGIN_CODE_ATTEMPTS - 1, true)]
    #[case(MAX_LOGIN_CODE_ATTEMPTS, false)]
    fn exhausted_code_rejects_even_the_right_guess(#[case] failed: u32, #[case] accepted: bool) {
        let now = Utc::now();
        let email = EmailAddress::parse("editor@footballvoice.test").expect("email");
        let (mut record, code) = LoginCode::issue(email, now, Duration::minutes(10));
        record.failed_attempts = failed;
        assert_eq!(record.accepts(&code, now), accepted);
    }
}
