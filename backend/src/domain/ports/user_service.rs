//! Driving port for account administration and self-service profiles.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Actor, Error, NewUser, User, UserChanges, Username};

/// Domain use-case port behind `/users/`.
#[async_trait]
pub trait UserService: Send + Sync {
    /// List accounts, optionally filtered by a username substring.
    async fn list(
        &self,
        actor: &Actor,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<User>, Error>;

    /// Create an account on behalf of an administrator.
    async fn create(&self, actor: &Actor, user: NewUser) -> Result<User, Error>;

    /// Fetch an account by username.
    async fn get(&self, actor: &Actor, username: &Username) -> Result<User, Error>;

    /// Partially update an account addressed by username.
    async fn update(
        &self,
        actor: &Actor,
        username: &Username,
        changes: UserChanges,
    ) -> Result<User, Error>;

    /// Remove an account addressed by username.
    async fn delete(&self, actor: &Actor, username: &Username) -> Result<(), Error>;

    /// The caller's own profile.
    async fn me(&self, actor: &Actor) -> Result<User, Error>;

    /// Update the caller's own profile; role changes are ignored.
    async fn update_me(&self, actor: &Actor, changes: UserChanges) -> Result<User, Error>;
}
