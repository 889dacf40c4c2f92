//! PostgreSQL-backed store of pending confirmation codes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PendingConfirmationRepository, PendingConfirmationRepositoryError};
use crate::domain::{ConfirmationCode, EmailAddress, PendingConfirmation, Username};

use super::diesel_helpers::{is_connection_error, map_diesel_error_message, map_pool_error_message};
use super::models::{NewPendingConfirmationRow, PendingConfirmationRow};
use super::pool::{DbPool, PoolError};
use super::schema::email_and_codes;

/// Diesel-backed implementation of the [`PendingConfirmationRepository`] port.
#[derive(Clone)]
pub struct DieselPendingConfirmationRepository {
    pool: DbPool,
}

impl DieselPendingConfirmationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PendingConfirmationRepositoryError {
    PendingConfirmationRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> PendingConfirmationRepositoryError {
    if is_connection_error(&error) {
        return PendingConfirmationRepositoryError::connection(map_diesel_error_message(
            error,
            "email_and_codes",
        ));
    }
    PendingConfirmationRepositoryError::query(map_diesel_error_message(error, "email_and_codes"))
}

fn row_to_pending(
    row: PendingConfirmationRow,
) -> Result<PendingConfirmation, PendingConfirmationRepositoryError> {
    let username = Username::new(row.username).map_err(|err| {
        PendingConfirmationRepositoryError::query(format!("invalid stored username: {err}"))
    })?;
    let email = EmailAddress::new(row.email).map_err(|err| {
        PendingConfirmationRepositoryError::query(format!("invalid stored email: {err}"))
    })?;
    let code = ConfirmationCode::new(row.confirm_code)
        .ok_or_else(|| PendingConfirmationRepositoryError::query("stored confirmation code is blank"))?;
    Ok(PendingConfirmation {
        username,
        email,
        code,
        expires_at: row.expire_date,
    })
}

#[async_trait]
impl PendingConfirmationRepository for DieselPendingConfirmationRepository {
    async fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<u64, PendingConfirmationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let purged = diesel::delete(email_and_codes::table.filter(email_and_codes::expire_date.le(now)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(purged).unwrap_or(0))
    }

    async fn upsert(
        &self,
        pending: &PendingConfirmation,
    ) -> Result<(), PendingConfirmationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPendingConfirmationRow {
            username: pending.username.as_ref(),
            email: pending.email.as_ref(),
            confirm_code: pending.code.as_ref(),
            expire_date: pending.expires_at,
        };
        diesel::insert_into(email_and_codes::table)
            .values(&row)
            .on_conflict(email_and_codes::email)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<PendingConfirmation>, PendingConfirmationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        email_and_codes::table
            .filter(email_and_codes::username.eq(username.as_ref()))
            .order(email_and_codes::expire_date.desc())
            .select(PendingConfirmationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_pending)
            .transpose()
    }

    async fn email_exists(
        &self,
        email: &EmailAddress,
    ) -> Result<bool, PendingConfirmationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            email_and_codes::table.filter(email_and_codes::email.eq(email.as_ref())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(&self, email: &EmailAddress) -> Result<(), PendingConfirmationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(email_and_codes::table.filter(email_and_codes::email.eq(email.as_ref())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
