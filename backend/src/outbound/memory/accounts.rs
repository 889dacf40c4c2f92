//! Users and pending email confirmations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    PendingConfirmationRepository, PendingConfirmationRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{EmailAddress, NewUser, PendingConfirmation, User, UserId, Username};

use super::{MemoryStore, Tables, matches_search, normalise_search};

/// In-memory [`UserRepository`].
#[derive(Debug, Clone)]
pub struct MemoryUserRepository {
    store: MemoryStore,
}

impl MemoryUserRepository {
    /// Repository over `store`.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

fn check_unique(
    tables: &Tables,
    username: &Username,
    email: &EmailAddress,
    except: Option<i64>,
) -> Result<(), UserRepositoryError> {
    let others = tables
        .users
        .rows
        .iter()
        .filter(|(id, _)| Some(**id) != except)
        .map(|(_, user)| user);
    for other in others {
        if other.username == *username {
            return Err(UserRepositoryError::duplicate_username());
        }
        if other.email == *email {
            return Err(UserRepositoryError::duplicate_email());
        }
    }
    Ok(())
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut tables = self.store.lock();
        check_unique(&tables, &user.username, &user.email, None)?;
        let id = tables.users.next_id;
        let created = User {
            id: UserId::new(id),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            bio: user.bio.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_staff: user.is_staff,
        };
        tables.users.insert(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.store.lock().users.rows.get(&id.get()).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.store.lock();
        Ok(tables
            .users
            .rows
            .values()
            .find(|user| user.username == *username)
            .cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let tables = self.store.lock();
        Ok(tables
            .users
            .rows
            .values()
            .find(|user| user.email == *email)
            .cloned())
    }

    async fn list(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<User>, UserRepositoryError> {
        let needle = normalise_search(search);
        let tables = self.store.lock();
        let matching: Vec<User> = tables
            .users
            .rows
            .values()
            .filter(|user| matches_search(user.username.as_ref(), needle.as_deref()))
            .cloned()
            .collect();
        Ok(Page::from_all(matching, page))
    }

    async fn update(&self, user: &User) -> Result<User, UserRepositoryError> {
        let mut tables = self.store.lock();
        let id = user.id.get();
        if !tables.users.rows.contains_key(&id) {
            return Err(UserRepositoryError::not_found());
        }
        check_unique(&tables, &user.username, &user.email, Some(id))?;
        tables.users.rows.insert(id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        let mut tables = self.store.lock();
        let raw = id.get();
        if tables.users.rows.remove(&raw).is_none() {
            return Ok(false);
        }
        tables.delete_reviews_where(|review| review.author_id == raw);
        tables.delete_comments_where(|comment| comment.author_id == raw);
        Ok(true)
    }
}

/// In-memory [`PendingConfirmationRepository`].
#[derive(Debug, Clone)]
pub struct MemoryPendingConfirmationRepository {
    store: MemoryStore,
}

impl MemoryPendingConfirmationRepository {
    /// Repository over `store`.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PendingConfirmationRepository for MemoryPendingConfirmationRepository {
    async fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<u64, PendingConfirmationRepositoryError> {
        let mut tables = self.store.lock();
        let before = tables.pending.len();
        tables.pending.retain(|pending| !pending.is_expired(now));
        let purged = before - tables.pending.len();
        Ok(u64::try_from(purged).unwrap_or(u64::MAX))
    }

    async fn upsert(
        &self,
        pending: &PendingConfirmation,
    ) -> Result<(), PendingConfirmationRepositoryError> {
        let mut tables = self.store.lock();
        match tables
            .pending
            .iter_mut()
            .find(|existing| existing.email == pending.email)
        {
            Some(existing) => *existing = pending.clone(),
            None => tables.pending.push(pending.clone()),
        }
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<PendingConfirmation>, PendingConfirmationRepositoryError> {
        let tables = self.store.lock();
        Ok(tables
            .pending
            .iter()
            .filter(|pending| pending.username == *username)
            .max_by_key(|pending| pending.expires_at)
            .cloned())
    }

    async fn email_exists(
        &self,
        email: &EmailAddress,
    ) -> Result<bool, PendingConfirmationRepositoryError> {
        let tables = self.store.lock();
        Ok(tables.pending.iter().any(|pending| pending.email == *email))
    }

    async fn delete(&self, email: &EmailAddress) -> Result<(), PendingConfirmationRepositoryError> {
        self.store
            .lock()
            .pending
            .retain(|pending| pending.email != *email);
        Ok(())
    }
}
