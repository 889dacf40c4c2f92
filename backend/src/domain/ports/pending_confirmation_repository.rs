//! Port for the short-lived store of confirmation codes awaiting exchange.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, PendingConfirmation, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by pending confirmation stores.
    pub enum PendingConfirmationRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "confirmation store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "confirmation store query failed: {message}",
    }
}

/// Keyed store of pending confirmations with explicit expiry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PendingConfirmationRepository: Send + Sync {
    /// Delete every record whose expiry is at or before `now`.
    async fn purge_expired(&self, now: DateTime<Utc>)
    -> Result<u64, PendingConfirmationRepositoryError>;

    /// Insert a record or replace the one stored for the same email.
    async fn upsert(
        &self,
        pending: &PendingConfirmation,
    ) -> Result<(), PendingConfirmationRepositoryError>;

    /// Fetch the record issued to `username`.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<PendingConfirmation>, PendingConfirmationRepositoryError>;

    /// Whether a record exists for `email`.
    async fn email_exists(
        &self,
        email: &EmailAddress,
    ) -> Result<bool, PendingConfirmationRepositoryError>;

    /// Remove the record stored for `email`.
    async fn delete(&self, email: &EmailAddress) -> Result<(), PendingConfirmationRepositoryError>;
}
