//! Port for category and genre reference data.
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{CatalogueEntry, CatalogueKind, Slug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repositories.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalogue repository query failed: {message}",
        /// An entry with the same slug already exists.
        DuplicateSlug { slug: String } => "slug `{slug}` is already in use",
    }
}

/// Port for listing, creating and removing categories and genres.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// List entries ordered by name, optionally filtered by a name substring.
    async fn list(
        &self,
        kind: CatalogueKind,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<CatalogueEntry>, CatalogueRepositoryError>;

    /// Insert a new entry.
    async fn create(
        &self,
        kind: CatalogueKind,
        entry: &CatalogueEntry,
    ) -> Result<CatalogueEntry, CatalogueRepositoryError>;

    /// Remove an entry by slug; returns whether a row was deleted.
    async fn delete(&self, kind: CatalogueKind, slug: &Slug)
    -> Result<bool, CatalogueRepositoryError>;
}
