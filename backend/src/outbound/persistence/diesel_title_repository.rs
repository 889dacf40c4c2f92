//! PostgreSQL-backed title repository.
//!
//! Titles are read in two passes: one query selects the page of title rows,
//! then categories, genre links and rating totals are loaded for that page in
//! bulk and stitched together.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::{Page, PageRequest};

use crate::domain::ports::{TitleRepository, TitleRepositoryError};
use crate::domain::{
    CatalogueEntry, Rating, Slug, Title, TitleChanges, TitleDraft, TitleFilter, TitleId,
};

use super::diesel_helpers::{
    contains_pattern, count_to_total, is_connection_error, limit_offset, map_diesel_error_message,
    map_pool_error_message,
};
use super::models::{CatalogueRow, NewGenreTitleRow, NewTitleRow, TitleRow, TitleUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, genre_titles, genres, reviews, titles};

/// Diesel-backed implementation of the [`TitleRepository`] port.
#[derive(Clone)]
pub struct DieselTitleRepository {
    pool: DbPool,
}

impl DieselTitleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TitleRepositoryError {
    TitleRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> TitleRepositoryError {
    if is_connection_error(&error) {
        return TitleRepositoryError::connection(map_diesel_error_message(error, "titles"));
    }
    TitleRepositoryError::query(map_diesel_error_message(error, "titles"))
}

fn row_to_entry(row: CatalogueRow) -> Result<CatalogueEntry, TitleRepositoryError> {
    CatalogueEntry::try_from_parts(&row.name, &row.slug).map_err(|err| {
        TitleRepositoryError::query(format!("invalid stored catalogue entry {}: {err}", row.id))
    })
}

async fn resolve_category(
    conn: &mut AsyncPgConnection,
    slug: &Slug,
) -> Result<i64, TitleRepositoryError> {
    categories::table
        .filter(categories::slug.eq(slug.as_ref()))
        .select(categories::id)
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?
        .ok_or_else(|| TitleRepositoryError::unknown_category(slug.to_string()))
}

async fn resolve_genres(
    conn: &mut AsyncPgConnection,
    slugs: &[Slug],
) -> Result<Vec<i64>, TitleRepositoryError> {
    let wanted: Vec<&str> = slugs.iter().map(AsRef::as_ref).collect();
    let found: Vec<(i64, String)> = genres::table
        .filter(genres::slug.eq_any(wanted))
        .select((genres::id, genres::slug))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let by_slug: HashMap<String, i64> = found.into_iter().map(|(id, slug)| (slug, id)).collect();
    let mut ids = Vec::with_capacity(slugs.len());
    for slug in slugs {
        let id = by_slug
            .get(slug.as_ref())
            .copied()
            .ok_or_else(|| TitleRepositoryError::unknown_genre(slug.to_string()))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

async fn replace_genre_links(
    conn: &mut AsyncPgConnection,
    title_id: i64,
    genre_ids: &[i64],
) -> Result<(), diesel::result::Error> {
    diesel::delete(genre_titles::table.filter(genre_titles::title_id.eq(title_id)))
        .execute(conn)
        .await?;
    let links: Vec<NewGenreTitleRow> = genre_ids
        .iter()
        .map(|genre_id| NewGenreTitleRow {
            genre_id: *genre_id,
            title_id,
        })
        .collect();
    if !links.is_empty() {
        diesel::insert_into(genre_titles::table)
            .values(&links)
            .execute(conn)
            .await?;
    }
    Ok(())
}

/// Attach categories, genres and ratings to a batch of title rows.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<TitleRow>,
) -> Result<Vec<Title>, TitleRepositoryError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let category_ids: Vec<i64> = rows.iter().filter_map(|row| row.category_id).collect();

    let category_rows: Vec<CatalogueRow> = categories::table
        .filter(categories::id.eq_any(category_ids))
        .select((categories::id, categories::name, categories::slug))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let mut categories_by_id = HashMap::new();
    for row in category_rows {
        categories_by_id.insert(row.id, row_to_entry(row)?);
    }

    let genre_rows: Vec<(i64, i64, String, String)> = genre_titles::table
        .inner_join(genres::table)
        .filter(genre_titles::title_id.eq_any(ids.clone()))
        .order(genres::id.asc())
        .select((genre_titles::title_id, genres::id, genres::name, genres::slug))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let mut genres_by_title: HashMap<i64, Vec<CatalogueEntry>> = HashMap::new();
    for (title_id, id, name, slug) in genre_rows {
        let entry = row_to_entry(CatalogueRow { id, name, slug })?;
        genres_by_title.entry(title_id).or_default().push(entry);
    }

    let rating_rows: Vec<(i64, Option<i64>, i64)> = reviews::table
        .filter(reviews::title_id.eq_any(ids))
        .group_by(reviews::title_id)
        .select((
            reviews::title_id,
            diesel::dsl::sum(reviews::score),
            diesel::dsl::count(reviews::id),
        ))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let ratings: HashMap<i64, Rating> = rating_rows
        .into_iter()
        .filter_map(|(title_id, total, reviews)| {
            Rating::from_totals(total.unwrap_or(0), reviews).map(|rating| (title_id, rating))
        })
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| Title {
            id: TitleId::new(row.id),
            category: row
                .category_id
                .and_then(|id| categories_by_id.get(&id).cloned()),
            genres: genres_by_title.remove(&row.id).unwrap_or_default(),
            rating: ratings.get(&row.id).copied(),
            name: row.name,
            year: row.year,
            description: row.description,
        })
        .collect())
}

async fn find_one(
    conn: &mut AsyncPgConnection,
    id: TitleId,
) -> Result<Option<Title>, TitleRepositoryError> {
    let row: Option<TitleRow> = titles::table
        .find(id.get())
        .select(TitleRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    match row {
        Some(row) => Ok(hydrate(conn, vec![row]).await?.into_iter().next()),
        None => Ok(None),
    }
}

fn filtered(filter: &TitleFilter) -> titles::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = titles::table.into_boxed();
    if let Some(name) = &filter.name {
        query = query.filter(titles::name.like(contains_pattern(name)));
    }
    if let Some(year) = filter.year {
        query = query.filter(titles::year.eq(year));
    }
    if let Some(category) = &filter.category {
        query = query.filter(
            titles::category_id.eq_any(
                categories::table
                    .filter(categories::slug.like(contains_pattern(category)))
                    .select(categories::id.nullable()),
            ),
        );
    }
    if let Some(genre) = &filter.genre {
        query = query.filter(
            titles::id.eq_any(
                genre_titles::table
                    .inner_join(genres::table)
                    .filter(genres::slug.like(contains_pattern(genre)))
                    .select(genre_titles::title_id),
            ),
        );
    }
    query
}

#[async_trait]
impl TitleRepository for DieselTitleRepository {
    async fn list(
        &self,
        filter: &TitleFilter,
        page: PageRequest,
    ) -> Result<Page<Title>, TitleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (limit, offset) = limit_offset(page);
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<TitleRow> = filtered(filter)
            .select(TitleRow::as_select())
            .order(titles::id.asc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = hydrate(&mut conn, rows).await?;
        Ok(Page::new(items, count_to_total(total)))
    }

    async fn find(&self, id: TitleId) -> Result<Option<Title>, TitleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        find_one(&mut conn, id).await
    }

    async fn create(&self, draft: &TitleDraft) -> Result<Title, TitleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let category_id = resolve_category(&mut conn, &draft.category).await?;
        let genre_ids = resolve_genres(&mut conn, &draft.genres).await?;
        let row = NewTitleRow {
            name: &draft.name,
            year: draft.year,
            description: draft.description.as_deref(),
            category_id: Some(category_id),
        };

        let id = conn
            .transaction(|conn| {
                async move {
                    let id: i64 = diesel::insert_into(titles::table)
                        .values(&row)
                        .returning(titles::id)
                        .get_result(conn)
                        .await?;
                    replace_genre_links(conn, id, &genre_ids).await?;
                    Ok::<_, diesel::result::Error>(id)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        find_one(&mut conn, TitleId::new(id))
            .await?
            .ok_or_else(TitleRepositoryError::not_found)
    }

    async fn update(
        &self,
        id: TitleId,
        changes: &TitleChanges,
    ) -> Result<Title, TitleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let category_id = match &changes.category {
            Some(slug) => Some(resolve_category(&mut conn, slug).await?),
            None => None,
        };
        let genre_ids = match &changes.genres {
            Some(slugs) => Some(resolve_genres(&mut conn, slugs).await?),
            None => None,
        };
        let update = TitleUpdate {
            name: changes.name.as_deref(),
            year: changes.year,
            description: changes.description.as_deref(),
            category_id,
        };
        let has_column_changes = update.name.is_some()
            || update.year.is_some()
            || update.description.is_some()
            || update.category_id.is_some();

        let title_id = id.get();
        let found = conn
            .transaction(|conn| {
                async move {
                    let exists: bool = diesel::select(diesel::dsl::exists(
                        titles::table.filter(titles::id.eq(title_id)),
                    ))
                    .get_result(conn)
                    .await?;
                    if !exists {
                        return Ok::<_, diesel::result::Error>(false);
                    }
                    if has_column_changes {
                        diesel::update(titles::table.find(title_id))
                            .set(&update)
                            .execute(conn)
                            .await?;
                    }
                    if let Some(genre_ids) = &genre_ids {
                        replace_genre_links(conn, title_id, genre_ids).await?;
                    }
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        if !found {
            return Err(TitleRepositoryError::not_found());
        }

        find_one(&mut conn, id)
            .await?
            .ok_or_else(TitleRepositoryError::not_found)
    }

    async fn delete(&self, id: TitleId) -> Result<bool, TitleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(titles::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
