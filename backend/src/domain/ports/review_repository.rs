//! Port for reviews, keyed by the title they belong to.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::{Review, ReviewId, Score, TitleId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repositories.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The author already reviewed this title.
        DuplicateReview => "cannot leave more than one review per title",
        /// The review to update does not exist.
        NotFound => "review not found",
    }
}

/// Review about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub title_id: TitleId,
    pub author: UserId,
    pub text: String,
    pub score: Score,
    pub pub_date: DateTime<Utc>,
}

/// Port for reading and writing reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// List reviews of a title ordered by id.
    async fn list(
        &self,
        title_id: TitleId,
        page: PageRequest,
    ) -> Result<Page<Review>, ReviewRepositoryError>;

    /// Fetch a review that belongs to `title_id`.
    async fn find(
        &self,
        title_id: TitleId,
        id: ReviewId,
    ) -> Result<Option<Review>, ReviewRepositoryError>;

    /// Insert a review; a second review by the same author is rejected.
    async fn create(&self, review: &NewReview) -> Result<Review, ReviewRepositoryError>;

    /// Persist edited text and score.
    async fn update(&self, review: &Review) -> Result<Review, ReviewRepositoryError>;

    /// Remove a review and its comments.
    async fn delete(&self, id: ReviewId) -> Result<bool, ReviewRepositoryError>;
}
