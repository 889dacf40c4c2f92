//! Port for titles, their genre links and rating aggregation.
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Title, TitleChanges, TitleDraft, TitleFilter, TitleId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by title repositories.
    pub enum TitleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "title repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "title repository query failed: {message}",
        /// The referenced category slug does not exist.
        UnknownCategory { slug: String } => "category `{slug}` does not exist",
        /// A referenced genre slug does not exist.
        UnknownGenre { slug: String } => "genre `{slug}` does not exist",
        /// The title to update does not exist.
        NotFound => "title not found",
    }
}

/// Port for reading and writing titles.
///
/// Read operations return titles annotated with their current rating.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TitleRepository: Send + Sync {
    /// List titles ordered by id that pass `filter`.
    async fn list(
        &self,
        filter: &TitleFilter,
        page: PageRequest,
    ) -> Result<Page<Title>, TitleRepositoryError>;

    /// Fetch one title.
    async fn find(&self, id: TitleId) -> Result<Option<Title>, TitleRepositoryError>;

    /// Insert a title, resolving category and genre slugs.
    async fn create(&self, draft: &TitleDraft) -> Result<Title, TitleRepositoryError>;

    /// Apply a partial update, replacing genre links when supplied.
    async fn update(
        &self,
        id: TitleId,
        changes: &TitleChanges,
    ) -> Result<Title, TitleRepositoryError>;

    /// Remove a title and everything hanging off it.
    async fn delete(&self, id: TitleId) -> Result<bool, TitleRepositoryError>;
}
