//! PostgreSQL-backed admin account and login code repositories.
//!
//! Digests are stored in their encoded `sha256$salt$digest` form and parsed
//! back into [`SecretDigest`] on read; a row that fails to parse is reported
//! as corrupt rather than silently rejecting every login.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{
    AdminRepository, AdminRepositoryError, LoginCodeRepository, LoginCodeRepositoryError,
};
use crate::domain::{AdminAccount, AdminChanges, AdminProfile, EmailAddress, LoginCode, SecretDigest};

use super::diesel_helpers::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{AdminRow, AdminUpdate, LoginCodeRow, NewAdminRow};
use super::pool::{DbPool, PoolError};
use super::schema::{admins, login_codes};

#[derive(Clone)]
pub struct DieselAdminRepository {
    pool: DbPool,
}

impl DieselAdminRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AdminRepositoryError {
    map_pool_error(error, |message| AdminRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error, email: Option<&EmailAddress>) -> AdminRepositoryError {
    if let Some(email) = email
        && is_unique_violation(&error)
    {
        return AdminRepositoryError::email_taken(email.as_str());
    }
    map_diesel_error(
        error,
        |message| AdminRepositoryError::query(message),
        |message| AdminRepositoryError::connection(message),
    )
}

fn row_to_account(row: AdminRow) -> Result<AdminAccount, AdminRepositoryError> {
    let email = EmailAddress::parse(&row.email)
        .map_err(|err| AdminRepositoryError::corrupt_credential(err.to_string()))?;
    let password = SecretDigest::parse(&row.password_digest)
        .map_err(|err| AdminRepositoryError::corrupt_credential(err.to_string()))?;
    Ok(AdminAccount {
        profile: AdminProfile {
            id: row.id,
            name: row.name,
            email,
        },
        password,
    })
}

#[async_trait]
impl AdminRepository for DieselAdminRepository {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<AdminAccount>, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        admins::table
            .filter(admins::email.eq(email.as_str()))
            .select(AdminRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(err, None))?
            .map(row_to_account)
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AdminAccount>, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        admins::table
            .find(id)
            .select(AdminRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(err, None))?
            .map(row_to_account)
            .transpose()
    }

    async fn insert(&self, account: &AdminAccount) -> Result<(), AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let digest = account.password.encode();
        let row = NewAdminRow {
            id: account.profile.id,
            name: &account.profile.name,
            email: account.profile.email.as_str(),
            password_digest: &digest,
        };
        diesel::insert_into(admins::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| diesel_error(err, Some(&account.profile.email)))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &AdminChanges,
    ) -> Result<Option<AdminAccount>, AdminRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let update = AdminUpdate {
            name: changes.name.as_deref(),
            email: changes.email.as_ref().map(EmailAddress::as_str),
            password_digest: changes.password.as_ref().map(SecretDigest::encode),
        };
        if update.name.is_none() && update.email.is_none() && update.password_digest.is_none() {
            return self.find_by_id(id).await;
        }
        diesel::update(admins::table.find(id))
            .set(&update)
            .returning(AdminRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(err, changes.email.as_ref()))?
            .map(row_to_account)
            .transpose()
    }
}

#[derive(Clone)]
pub struct DieselLoginCodeRepository {
    pool: DbPool,
}

impl DieselLoginCodeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn code_pool_error(error: PoolError) -> LoginCodeRepositoryError {
    map_pool_error(error, |message| LoginCodeRepositoryError::connection(message))
}

fn code_diesel_error(error: diesel::result::Error) -> LoginCodeRepositoryError {
    map_diesel_error(
        error,
        |message| LoginCodeRepositoryError::query(message),
        |message| LoginCodeRepositoryError::connection(message),
    )
}

/// The column is checked non-negative; anything else reads as exhausted.
fn attempts_from_column(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[async_trait]
impl LoginCodeRepository for DieselLoginCodeRepository {
    async fn replace(&self, code: &LoginCode) -> Result<(), LoginCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(code_pool_error)?;
        let row = LoginCodeRow {
            email: code.email.as_str().to_owned(),
            code_digest: code.digest.encode(),
            expires_at: code.expires_at,
            failed_attempts: 0,
        };
        diesel::insert_into(login_codes::table)
            .values(&row)
            .on_conflict(login_codes::email)
            .do_update()
            .set((
                login_codes::code_digest.eq(excluded(login_codes::code_digest)),
                login_codes::expires_at.eq(excluded(login_codes::expires_at)),
                login_codes::failed_attempts.eq(0),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(code_diesel_error)
    }

    async fn find(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<LoginCode>, LoginCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(code_pool_error)?;
        let row: Option<LoginCodeRow> = login_codes::table
            .find(email.as_str())
            .select(LoginCodeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(code_diesel_error)?;
        row.map(|row| {
            let digest = SecretDigest::parse(&row.code_digest)
                .map_err(|err| LoginCodeRepositoryError::query(err.to_string()))?;
            Ok(LoginCode {
                email: email.clone(),
                digest,
                expires_at: row.expires_at,
                failed_attempts: attempts_from_column(row.failed_attempts),
            })
        })
        .transpose()
    }

    async fn record_failure(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<u32>, LoginCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(code_pool_error)?;
        let attempts: Option<i32> = diesel::update(login_codes::table.find(email.as_str()))
            .set(login_codes::failed_attempts.eq(login_codes::failed_attempts + 1))
            .returning(login_codes::failed_attempts)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(code_diesel_error)?;
        Ok(attempts.map(attempts_from_column))
    }

    async fn consume(&self, email: &EmailAddress) -> Result<bool, LoginCodeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(code_pool_error)?;
        let deleted = diesel::delete(login_codes::table.find(email.as_str()))
            .execute(&mut conn)
            .await
            .map_err(code_diesel_error)?;
        Ok(deleted > 0)
    }
}
