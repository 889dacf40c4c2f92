//! PostgreSQL-backed category and genre repository.
//!
//! Both tables share a shape, so each operation dispatches on
//! [`CatalogueKind`] to the matching table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{CatalogueEntry, CatalogueKind, Slug};

use super::diesel_helpers::{
    contains_pattern, count_to_total, is_connection_error, limit_offset, map_diesel_error_message,
    map_pool_error_message, search_term, unique_violation,
};
use super::models::{CatalogueRow, NewCategoryRow, NewGenreRow};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, genres};

/// Diesel-backed implementation of the [`CatalogueRepository`] port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    CatalogueRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, slug: &str) -> CatalogueRepositoryError {
    if unique_violation(&error).is_some() {
        return CatalogueRepositoryError::duplicate_slug(slug);
    }
    if is_connection_error(&error) {
        return CatalogueRepositoryError::connection(map_diesel_error_message(error, "catalogue"));
    }
    CatalogueRepositoryError::query(map_diesel_error_message(error, "catalogue"))
}

pub(super) fn row_to_entry(row: CatalogueRow) -> Result<CatalogueEntry, CatalogueRepositoryError> {
    CatalogueEntry::try_from_parts(&row.name, &row.slug).map_err(|err| {
        CatalogueRepositoryError::query(format!("invalid stored entry {}: {err}", row.id))
    })
}

macro_rules! list_entries {
    ($table:ident, $conn:expr, $pattern:expr, $limit:expr, $offset:expr) => {{
        let mut count_query = $table::table.count().into_boxed();
        let mut rows_query = $table::table
            .select(($table::id, $table::name, $table::slug))
            .order(($table::name.asc(), $table::id.asc()))
            .limit($limit)
            .offset($offset)
            .into_boxed();
        if let Some(pattern) = $pattern {
            count_query = count_query.filter($table::name.ilike(pattern.clone()));
            rows_query = rows_query.filter($table::name.ilike(pattern));
        }
        let total: i64 = count_query
            .get_result($conn)
            .await
            .map_err(|err| map_diesel_error(err, ""))?;
        let rows: Vec<CatalogueRow> = rows_query
            .load($conn)
            .await
            .map_err(|err| map_diesel_error(err, ""))?;
        (total, rows)
    }};
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list(
        &self,
        kind: CatalogueKind,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<CatalogueEntry>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = search_term(search).map(|term| contains_pattern(&term));
        let (limit, offset) = limit_offset(page);
        let (total, rows) = match kind {
            CatalogueKind::Category => list_entries!(categories, &mut conn, pattern, limit, offset),
            CatalogueKind::Genre => list_entries!(genres, &mut conn, pattern, limit, offset),
        };
        let items = rows
            .into_iter()
            .map(row_to_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, count_to_total(total)))
    }

    async fn create(
        &self,
        kind: CatalogueKind,
        entry: &CatalogueEntry,
    ) -> Result<CatalogueEntry, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let slug = entry.slug.as_ref();
        let inserted = match kind {
            CatalogueKind::Category => {
                diesel::insert_into(categories::table)
                    .values(&NewCategoryRow {
                        name: &entry.name,
                        slug,
                    })
                    .execute(&mut conn)
                    .await
            }
            CatalogueKind::Genre => {
                diesel::insert_into(genres::table)
                    .values(&NewGenreRow {
                        name: &entry.name,
                        slug,
                    })
                    .execute(&mut conn)
                    .await
            }
        };
        inserted.map_err(|err| map_diesel_error(err, slug))?;
        Ok(entry.clone())
    }

    async fn delete(
        &self,
        kind: CatalogueKind,
        slug: &Slug,
    ) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = match kind {
            CatalogueKind::Category => {
                diesel::delete(categories::table.filter(categories::slug.eq(slug.as_ref())))
                    .execute(&mut conn)
                    .await
            }
            CatalogueKind::Genre => {
                diesel::delete(genres::table.filter(genres::slug.eq(slug.as_ref())))
                    .execute(&mut conn)
                    .await
            }
        };
        Ok(deleted.map_err(|err| map_diesel_error(err, slug.as_ref()))? > 0)
    }
}
