//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, NewUser, Role, User, UserId, Username};

use super::diesel_helpers::{
    contains_pattern, count_to_total, is_connection_error, limit_offset, map_diesel_error_message,
    map_pool_error_message, search_term, unique_violation,
};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    if let Some(constraint) = unique_violation(&error) {
        return if constraint.contains("email") {
            UserRepositoryError::duplicate_email()
        } else {
            UserRepositoryError::duplicate_username()
        };
    }
    if is_connection_error(&error) {
        return UserRepositoryError::connection(map_diesel_error_message(error, "users"));
    }
    UserRepositoryError::query(map_diesel_error_message(error, "users"))
}

/// Convert a database row to a domain user.
fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let id = row.id;
    let invalid = |err: crate::domain::UserValidationError| {
        UserRepositoryError::query(format!("invalid stored user {id}: {err}"))
    };
    Ok(User {
        id: UserId::new(id),
        username: Username::new(row.username).map_err(invalid)?,
        email: EmailAddress::new(row.email).map_err(invalid)?,
        role: row.role.parse::<Role>().map_err(invalid)?,
        bio: row.bio,
        first_name: row.first_name,
        last_name: row.last_name,
        is_staff: row.is_staff,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            role: user.role.as_str(),
            bio: user.bio.as_deref(),
            first_name: user.first_name.as_deref(),
            last_name: user.last_name.as_deref(),
            is_staff: user.is_staff,
        };
        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn list(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = search_term(search).map(|term| contains_pattern(&term));
        let (limit, offset) = limit_offset(page);

        let mut count_query = users::table.count().into_boxed();
        let mut rows_query = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .limit(limit)
            .offset(offset)
            .into_boxed();
        if let Some(pattern) = pattern {
            count_query = count_query.filter(users::username.ilike(pattern.clone()));
            rows_query = rows_query.filter(users::username.ilike(pattern));
        }

        let total: i64 = count_query
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = rows_query.load(&mut conn).await.map_err(map_diesel_error)?;
        let items = rows
            .into_iter()
            .map(row_to_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, count_to_total(total)))
    }

    async fn update(&self, user: &User) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserUpdate {
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            role: user.role.as_str(),
            bio: user.bio.as_deref(),
            first_name: user.first_name.as_deref(),
            last_name: user.last_name.as_deref(),
        };
        let stored: Option<UserRow> = diesel::update(users::table.find(user.id.get()))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        stored
            .map(row_to_user)
            .transpose()?
            .ok_or_else(UserRepositoryError::not_found)
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
