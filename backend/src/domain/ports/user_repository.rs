//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{EmailAddress, NewUser, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the username.
        DuplicateUsername => "username already registered",
        /// Another account already uses the email address.
        DuplicateEmail => "email already registered",
        /// The user to update does not exist.
        NotFound => "user not found",
    }
}

/// Port for storing and looking up accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, enforcing username and email uniqueness.
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// List users ordered by id, optionally filtered by a username substring.
    async fn list(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<User>, UserRepositoryError>;

    /// Overwrite a stored user, enforcing uniqueness against other accounts.
    async fn update(&self, user: &User) -> Result<User, UserRepositoryError>;

    /// Remove a user; returns whether a row was deleted.
    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError>;
}
