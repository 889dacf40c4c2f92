//! In-memory adapters for every repository port.
//!
//! All repositories share one [`MemoryStore`], so cross-table rules behave as
//! they do in PostgreSQL: unique usernames, emails, slugs and
//! `(author, title)` review pairs are enforced, and deleting a user, title or
//! review cascades to the rows that reference it. Used by tests and by
//! database-less development runs.

mod accounts;
mod catalogue;
mod reviews;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::domain::{CatalogueEntry, PendingConfirmation, Score, User};

pub use accounts::{MemoryPendingConfirmationRepository, MemoryUserRepository};
pub use catalogue::{MemoryCatalogueRepository, MemoryTitleRepository};
pub use reviews::{MemoryCommentRepository, MemoryReviewRepository};

/// Rows keyed by a bigserial-style identifier.
#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn insert(&mut self, row: T) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.insert(id, row);
        id
    }
}

#[derive(Debug, Clone)]
struct TitleRecord {
    name: String,
    year: i32,
    description: Option<String>,
    category_id: Option<i64>,
    genre_ids: Vec<i64>,
}

#[derive(Debug, Clone)]
struct ReviewRecord {
    title_id: i64,
    author_id: i64,
    text: String,
    score: Score,
    pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CommentRecord {
    review_id: i64,
    author_id: i64,
    text: String,
    pub_date: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    pending: Vec<PendingConfirmation>,
    categories: Table<CatalogueEntry>,
    genres: Table<CatalogueEntry>,
    titles: Table<TitleRecord>,
    reviews: Table<ReviewRecord>,
    comments: Table<CommentRecord>,
}

impl Tables {
    fn delete_comments_where(&mut self, doomed: impl Fn(&CommentRecord) -> bool) {
        self.comments.rows.retain(|_, comment| !doomed(comment));
    }

    fn delete_reviews_where(&mut self, doomed: impl Fn(&ReviewRecord) -> bool) {
        let removed: Vec<i64> = self
            .reviews
            .rows
            .iter()
            .filter(|(_, review)| doomed(review))
            .map(|(id, _)| *id)
            .collect();
        for id in &removed {
            self.reviews.rows.remove(id);
        }
        self.delete_comments_where(|comment| removed.contains(&comment.review_id));
    }
}

/// Shared state behind the in-memory repositories.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lowercased, trimmed search term; blank terms disable the filter.
fn normalise_search(search: Option<String>) -> Option<String> {
    search
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
}

fn matches_search(haystack: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|needle| haystack.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests;
