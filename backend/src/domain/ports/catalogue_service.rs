//! Driving port for category and genre management.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Actor, CatalogueEntry, CatalogueKind, Error, Slug};

/// Domain use-case port behind `/categories/` and `/genres/`.
#[async_trait]
pub trait CatalogueService: Send + Sync {
    /// List entries of `kind`, optionally filtered by a name substring.
    async fn list(
        &self,
        actor: &Actor,
        kind: CatalogueKind,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<CatalogueEntry>, Error>;

    /// Create an entry.
    async fn create(
        &self,
        actor: &Actor,
        kind: CatalogueKind,
        entry: CatalogueEntry,
    ) -> Result<CatalogueEntry, Error>;

    /// Remove an entry by slug.
    async fn delete(&self, actor: &Actor, kind: CatalogueKind, slug: &Slug) -> Result<(), Error>;
}
