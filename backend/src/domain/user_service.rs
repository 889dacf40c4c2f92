//! Account administration and self-service profile use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::ports::{UserRepository, UserService};
use crate::domain::{
    Access, Actor, Error, NewUser, Policy, Subject, User, UserChanges, UserValidationError,
    Username,
};

/// User service implementing the [`UserService`] driving port.
#[derive(Clone)]
pub struct DomainUserService {
    users: Arc<dyn UserRepository>,
}

impl DomainUserService {
    /// Create a service backed by `users`.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    async fn load(&self, username: &Username) -> Result<User, Error> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| Error::not_found(format!("user `{username}` not found")))
    }

    async fn save(&self, mut user: User, changes: UserChanges) -> Result<User, Error> {
        if let Some(username) = &changes.username {
            if username.is_reserved() {
                return Err(UserValidationError::ReservedUsername.into());
            }
        }
        user.apply(changes);
        Ok(self.users.update(&user).await?)
    }
}

#[async_trait]
impl UserService for DomainUserService {
    async fn list(
        &self,
        actor: &Actor,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<User>, Error> {
        Policy::AdminOnly.authorize(actor, Access::Read, Subject::Collection)?;
        Ok(self.users.list(search, page).await?)
    }

    async fn create(&self, actor: &Actor, user: NewUser) -> Result<User, Error> {
        Policy::AdminOnly.authorize(actor, Access::Create, Subject::Collection)?;
        if user.username.is_reserved() {
            return Err(UserValidationError::ReservedUsername.into());
        }
        let created = self.users.create(&user).await?;
        info!(username = %created.username, role = %created.role, "user created by administrator");
        Ok(created)
    }

    async fn get(&self, actor: &Actor, username: &Username) -> Result<User, Error> {
        Policy::AdminOnly.authorize(actor, Access::Read, Subject::Collection)?;
        self.load(username).await
    }

    async fn update(
        &self,
        actor: &Actor,
        username: &Username,
        changes: UserChanges,
    ) -> Result<User, Error> {
        Policy::AdminOnly.authorize(actor, Access::Update, Subject::Collection)?;
        let user = self.load(username).await?;
        self.save(user, changes).await
    }

    async fn delete(&self, actor: &Actor, username: &Username) -> Result<(), Error> {
        Policy::AdminOnly.authorize(actor, Access::Delete, Subject::Collection)?;
        let user = self.load(username).await?;
        if !self.users.delete(user.id).await? {
            return Err(Error::not_found(format!("user `{username}` not found")));
        }
        info!(username = %user.username, "user deleted");
        Ok(())
    }

    async fn me(&self, actor: &Actor) -> Result<User, Error> {
        Policy::SelfOrAdmin.authorize(actor, Access::Read, Subject::OwnProfile)?;
        let caller = actor.require_user()?;
        self.users
            .find_by_id(caller.id)
            .await?
            .ok_or_else(|| Error::unauthorized("user for this token no longer exists"))
    }

    async fn update_me(&self, actor: &Actor, changes: UserChanges) -> Result<User, Error> {
        let current = self.me(actor).await?;
        let changes = UserChanges {
            role: None,
            ..changes
        };
        self.save(current, changes).await
    }
}
