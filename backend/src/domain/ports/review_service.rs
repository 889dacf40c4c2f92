//! Driving port for reviews nested under titles.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Actor, Error, Review, ReviewChanges, ReviewDraft, ReviewId, TitleId};

/// Domain use-case port behind `/titles/{title_id}/reviews/`.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// List reviews of a title.
    async fn list(&self, actor: &Actor, title_id: TitleId, page: PageRequest)
    -> Result<Page<Review>, Error>;

    /// Review a title as the calling user.
    async fn create(
        &self,
        actor: &Actor,
        title_id: TitleId,
        draft: ReviewDraft,
    ) -> Result<Review, Error>;

    /// Fetch one review of a title.
    async fn get(&self, actor: &Actor, title_id: TitleId, id: ReviewId) -> Result<Review, Error>;

    /// Edit a review.
    async fn update(
        &self,
        actor: &Actor,
        title_id: TitleId,
        id: ReviewId,
        changes: ReviewChanges,
    ) -> Result<Review, Error>;

    /// Remove a review and its comments.
    async fn delete(&self, actor: &Actor, title_id: TitleId, id: ReviewId) -> Result<(), Error>;
}
