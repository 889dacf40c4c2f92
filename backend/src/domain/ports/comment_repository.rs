//! Port for comments, keyed by the review they belong to.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::{Comment, CommentId, ReviewId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repositories.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
        /// The comment to update does not exist.
        NotFound => "comment not found",
    }
}

/// Comment about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub review_id: ReviewId,
    pub author: UserId,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

/// Port for reading and writing comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// List comments on a review ordered by id.
    async fn list(
        &self,
        review_id: ReviewId,
        page: PageRequest,
    ) -> Result<Page<Comment>, CommentRepositoryError>;

    /// Fetch a comment that belongs to `review_id`.
    async fn find(
        &self,
        review_id: ReviewId,
        id: CommentId,
    ) -> Result<Option<Comment>, CommentRepositoryError>;

    /// Insert a comment.
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError>;

    /// Persist edited text.
    async fn update(&self, comment: &Comment) -> Result<Comment, CommentRepositoryError>;

    /// Remove a comment.
    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError>;
}
