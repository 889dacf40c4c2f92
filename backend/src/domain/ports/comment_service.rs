//! Driving port for comments nested under reviews.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Actor, Comment, CommentId, CommentText, Error, ReviewId, TitleId};

/// Address of a review as it appears in nested routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewPath {
    pub title_id: TitleId,
    pub review_id: ReviewId,
}

/// Domain use-case port behind `/titles/{title_id}/reviews/{review_id}/comments/`.
#[async_trait]
pub trait CommentService: Send + Sync {
    /// List comments on a review.
    async fn list(
        &self,
        actor: &Actor,
        path: ReviewPath,
        page: PageRequest,
    ) -> Result<Page<Comment>, Error>;

    /// Comment on a review as the calling user.
    async fn create(
        &self,
        actor: &Actor,
        path: ReviewPath,
        text: CommentText,
    ) -> Result<Comment, Error>;

    /// Fetch one comment.
    async fn get(&self, actor: &Actor, path: ReviewPath, id: CommentId) -> Result<Comment, Error>;

    /// Replace a comment's text.
    async fn update(
        &self,
        actor: &Actor,
        path: ReviewPath,
        id: CommentId,
        text: CommentText,
    ) -> Result<Comment, Error>;

    /// Remove a comment.
    async fn delete(&self, actor: &Actor, path: ReviewPath, id: CommentId) -> Result<(), Error>;
}
