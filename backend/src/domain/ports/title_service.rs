//! Driving port for the title catalogue.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Actor, Error, Title, TitleFilter, TitleId, TitleInput};

/// Domain use-case port behind `/titles/`.
///
/// Writes take raw [`TitleInput`] so the service can validate the release
/// year against its own clock.
#[async_trait]
pub trait TitleService: Send + Sync {
    /// List titles matching `filter`.
    async fn list(
        &self,
        actor: &Actor,
        filter: TitleFilter,
        page: PageRequest,
    ) -> Result<Page<Title>, Error>;

    /// Create a title.
    async fn create(&self, actor: &Actor, input: TitleInput) -> Result<Title, Error>;

    /// Fetch a title with its rating.
    async fn get(&self, actor: &Actor, id: TitleId) -> Result<Title, Error>;

    /// Partially update a title.
    async fn update(&self, actor: &Actor, id: TitleId, input: TitleInput) -> Result<Title, Error>;

    /// Remove a title together with its reviews and comments.
    async fn delete(&self, actor: &Actor, id: TitleId) -> Result<(), Error>;
}
