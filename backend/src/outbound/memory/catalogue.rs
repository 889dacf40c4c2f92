//! Categories, genres and titles.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    CatalogueRepository, CatalogueRepositoryError, TitleRepository, TitleRepositoryError,
};
use crate::domain::{
    CatalogueEntry, CatalogueKind, Rating, Slug, Title, TitleChanges, TitleDraft, TitleFilter,
    TitleId,
};

use super::{MemoryStore, Table, TitleRecord, Tables, matches_search, normalise_search};

fn table(tables: &Tables, kind: CatalogueKind) -> &Table<CatalogueEntry> {
    match kind {
        CatalogueKind::Category => &tables.categories,
        CatalogueKind::Genre => &tables.genres,
    }
}

fn table_mut(tables: &mut Tables, kind: CatalogueKind) -> &mut Table<CatalogueEntry> {
    match kind {
        CatalogueKind::Category => &mut tables.categories,
        CatalogueKind::Genre => &mut tables.genres,
    }
}

fn id_of(table: &Table<CatalogueEntry>, slug: &Slug) -> Option<i64> {
    table
        .rows
        .iter()
        .find(|(_, entry)| entry.slug == *slug)
        .map(|(id, _)| *id)
}

/// In-memory [`CatalogueRepository`].
#[derive(Debug, Clone)]
pub struct MemoryCatalogueRepository {
    store: MemoryStore,
}

impl MemoryCatalogueRepository {
    /// Repository over `store`.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogueRepository for MemoryCatalogueRepository {
    async fn list(
        &self,
        kind: CatalogueKind,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<CatalogueEntry>, CatalogueRepositoryError> {
        let needle = normalise_search(search);
        let tables = self.store.lock();
        let mut matching: Vec<(i64, CatalogueEntry)> = table(&tables, kind)
            .rows
            .iter()
            .filter(|(_, entry)| matches_search(&entry.name, needle.as_deref()))
            .map(|(id, entry)| (*id, entry.clone()))
            .collect();
        matching.sort_by(|(a_id, a), (b_id, b)| a.name.cmp(&b.name).then(a_id.cmp(b_id)));
        let entries = matching.into_iter().map(|(_, entry)| entry).collect();
        Ok(Page::from_all(entries, page))
    }

    async fn create(
        &self,
        kind: CatalogueKind,
        entry: &CatalogueEntry,
    ) -> Result<CatalogueEntry, CatalogueRepositoryError> {
        let mut tables = self.store.lock();
        let target = table_mut(&mut tables, kind);
        if id_of(target, &entry.slug).is_some() {
            return Err(CatalogueRepositoryError::duplicate_slug(entry.slug.to_string()));
        }
        target.insert(entry.clone());
        Ok(entry.clone())
    }

    async fn delete(
        &self,
        kind: CatalogueKind,
        slug: &Slug,
    ) -> Result<bool, CatalogueRepositoryError> {
        let mut tables = self.store.lock();
        let Some(id) = id_of(table(&tables, kind), slug) else {
            return Ok(false);
        };
        table_mut(&mut tables, kind).rows.remove(&id);
        for title in tables.titles.rows.values_mut() {
            match kind {
                CatalogueKind::Category if title.category_id == Some(id) => {
                    title.category_id = None;
                }
                CatalogueKind::Genre => title.genre_ids.retain(|genre| *genre != id),
                CatalogueKind::Category => {}
            }
        }
        Ok(true)
    }
}

/// In-memory [`TitleRepository`].
#[derive(Debug, Clone)]
pub struct MemoryTitleRepository {
    store: MemoryStore,
}

impl MemoryTitleRepository {
    /// Repository over `store`.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

fn resolve_category(tables: &Tables, slug: &Slug) -> Result<i64, TitleRepositoryError> {
    id_of(&tables.categories, slug)
        .ok_or_else(|| TitleRepositoryError::unknown_category(slug.to_string()))
}

fn resolve_genres(tables: &Tables, slugs: &[Slug]) -> Result<Vec<i64>, TitleRepositoryError> {
    let mut ids = Vec::with_capacity(slugs.len());
    for slug in slugs {
        let id = id_of(&tables.genres, slug)
            .ok_or_else(|| TitleRepositoryError::unknown_genre(slug.to_string()))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

fn hydrate(tables: &Tables, id: i64, record: &TitleRecord) -> Title {
    let mut genre_ids = record.genre_ids.clone();
    genre_ids.sort_unstable();
    let rating = Rating::from_scores(
        tables
            .reviews
            .rows
            .values()
            .filter(|review| review.title_id == id)
            .map(|review| review.score.get()),
    );
    Title {
        id: TitleId::new(id),
        name: record.name.clone(),
        year: record.year,
        description: record.description.clone(),
        category: record
            .category_id
            .and_then(|category| tables.categories.rows.get(&category).cloned()),
        genres: genre_ids
            .iter()
            .filter_map(|genre| tables.genres.rows.get(genre).cloned())
            .collect(),
        rating,
    }
}

#[async_trait]
impl TitleRepository for MemoryTitleRepository {
    async fn list(
        &self,
        filter: &TitleFilter,
        page: PageRequest,
    ) -> Result<Page<Title>, TitleRepositoryError> {
        let tables = self.store.lock();
        let matching: Vec<Title> = tables
            .titles
            .rows
            .iter()
            .map(|(id, record)| hydrate(&tables, *id, record))
            .filter(|title| filter.matches(title))
            .collect();
        Ok(Page::from_all(matching, page))
    }

    async fn find(&self, id: TitleId) -> Result<Option<Title>, TitleRepositoryError> {
        let tables = self.store.lock();
        Ok(tables
            .titles
            .rows
            .get(&id.get())
            .map(|record| hydrate(&tables, id.get(), record)))
    }

    async fn create(&self, draft: &TitleDraft) -> Result<Title, TitleRepositoryError> {
        let mut tables = self.store.lock();
        let record = TitleRecord {
            name: draft.name.clone(),
            year: draft.year,
            description: draft.description.clone(),
            category_id: Some(resolve_category(&tables, &draft.category)?),
            genre_ids: resolve_genres(&tables, &draft.genres)?,
        };
        let id = tables.titles.insert(record.clone());
        Ok(hydrate(&tables, id, &record))
    }

    async fn update(
        &self,
        id: TitleId,
        changes: &TitleChanges,
    ) -> Result<Title, TitleRepositoryError> {
        let mut tables = self.store.lock();
        let raw = id.get();
        let mut record = tables
            .titles
            .rows
            .get(&raw)
            .cloned()
            .ok_or_else(TitleRepositoryError::not_found)?;
        if let Some(slug) = &changes.category {
            record.category_id = Some(resolve_category(&tables, slug)?);
        }
        if let Some(slugs) = &changes.genres {
            record.genre_ids = resolve_genres(&tables, slugs)?;
        }
        if let Some(name) = &changes.name {
            record.name.clone_from(name);
        }
        if let Some(year) = changes.year {
            record.year = year;
        }
        if changes.description.is_some() {
            record.description.clone_from(&changes.description);
        }
        tables.titles.rows.insert(raw, record.clone());
        Ok(hydrate(&tables, raw, &record))
    }

    async fn delete(&self, id: TitleId) -> Result<bool, TitleRepositoryError> {
        let mut tables = self.store.lock();
        let raw = id.get();
        if tables.titles.rows.remove(&raw).is_none() {
            return Ok(false);
        }
        tables.delete_reviews_where(|review| review.title_id == raw);
        Ok(true)
    }
}
