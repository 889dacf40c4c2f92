//! Reviews of titles and the comment threads under them.
//!
//! Reads are open to everyone; writes follow [`Policy::ContentOwnership`].
//! A review or comment addressed through a parent it does not belong to is
//! reported as missing.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::ports::{
    CommentRepository, CommentService, NewComment, NewReview, ReviewPath, ReviewRepository,
    ReviewService, TitleRepository,
};
use crate::domain::{
    Access, Actor, Comment, CommentId, CommentText, Error, Policy, Review, ReviewChanges,
    ReviewDraft, ReviewId, Subject, TitleId,
};

const POLICY: Policy = Policy::ContentOwnership;

/// Review service implementing the [`ReviewService`] driving port.
#[derive(Clone)]
pub struct DomainReviewService {
    titles: Arc<dyn TitleRepository>,
    reviews: Arc<dyn ReviewRepository>,
    clock: Arc<dyn Clock>,
}

impl DomainReviewService {
    /// Create a service over title and review storage.
    pub fn new(
        titles: Arc<dyn TitleRepository>,
        reviews: Arc<dyn ReviewRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            titles,
            reviews,
            clock,
        }
    }

    async fn ensure_title(&self, title_id: TitleId) -> Result<(), Error> {
        match self.titles.find(title_id).await? {
            Some(_) => Ok(()),
            None => Err(Error::not_found(format!("title {title_id} not found"))),
        }
    }

    async fn load(&self, title_id: TitleId, id: ReviewId) -> Result<Review, Error> {
        self.reviews
            .find(title_id, id)
            .await?
            .ok_or_else(|| review_not_found(id))
    }
}

fn review_not_found(id: ReviewId) -> Error {
    Error::not_found(format!("review {} not found", id.get()))
}

#[async_trait]
impl ReviewService for DomainReviewService {
    async fn list(
        &self,
        actor: &Actor,
        title_id: TitleId,
        page: PageRequest,
    ) -> Result<Page<Review>, Error> {
        POLICY.authorize(actor, Access::Read, Subject::Collection)?;
        self.ensure_title(title_id).await?;
        Ok(self.reviews.list(title_id, page).await?)
    }

    async fn create(
        &self,
        actor: &Actor,
        title_id: TitleId,
        draft: ReviewDraft,
    ) -> Result<Review, Error> {
        POLICY.authorize(actor, Access::Create, Subject::Collection)?;
        let author = actor.require_user()?;
        self.ensure_title(title_id).await?;
        let review = self
            .reviews
            .create(&NewReview {
                title_id,
                author: author.id,
                text: draft.text,
                score: draft.score,
                pub_date: self.clock.utc(),
            })
            .await?;
        info!(review_id = review.id.get(), %title_id, "review created");
        Ok(review)
    }

    async fn get(&self, actor: &Actor, title_id: TitleId, id: ReviewId) -> Result<Review, Error> {
        POLICY.authorize(actor, Access::Read, Subject::Collection)?;
        self.load(title_id, id).await
    }

    async fn update(
        &self,
        actor: &Actor,
        title_id: TitleId,
        id: ReviewId,
        changes: ReviewChanges,
    ) -> Result<Review, Error> {
        actor.require_user()?;
        let mut review = self.load(title_id, id).await?;
        POLICY.authorize(actor, Access::Update, Subject::Owned(review.author))?;
        review.apply(changes);
        Ok(self.reviews.update(&review).await?)
    }

    async fn delete(&self, actor: &Actor, title_id: TitleId, id: ReviewId) -> Result<(), Error> {
        actor.require_user()?;
        let review = self.load(title_id, id).await?;
        POLICY.authorize(actor, Access::Delete, Subject::Owned(review.author))?;
        if !self.reviews.delete(id).await? {
            return Err(review_not_found(id));
        }
        info!(review_id = id.get(), "review deleted");
        Ok(())
    }
}

/// Comment service implementing the [`CommentService`] driving port.
#[derive(Clone)]
pub struct DomainCommentService {
    reviews: Arc<dyn ReviewRepository>,
    comments: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
}

impl DomainCommentService {
    /// Create a service over review and comment storage.
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        comments: Arc<dyn CommentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reviews,
            comments,
            clock,
        }
    }

    async fn ensure_review(&self, path: ReviewPath) -> Result<(), Error> {
        match self.reviews.find(path.title_id, path.review_id).await? {
            Some(_) => Ok(()),
            None => Err(review_not_found(path.review_id)),
        }
    }

    async fn load(&self, path: ReviewPath, id: CommentId) -> Result<Comment, Error> {
        self.ensure_review(path).await?;
        self.comments
            .find(path.review_id, id)
            .await?
            .ok_or_else(|| comment_not_found(id))
    }
}

fn comment_not_found(id: CommentId) -> Error {
    Error::not_found(format!("comment {} not found", id.get()))
}

#[async_trait]
impl CommentService for DomainCommentService {
    async fn list(
        &self,
        actor: &Actor,
        path: ReviewPath,
        page: PageRequest,
    ) -> Result<Page<Comment>, Error> {
        POLICY.authorize(actor, Access::Read, Subject::Collection)?;
        self.ensure_review(path).await?;
        Ok(self.comments.list(path.review_id, page).await?)
    }

    async fn create(
        &self,
        actor: &Actor,
        path: ReviewPath,
        text: CommentText,
    ) -> Result<Comment, Error> {
        POLICY.authorize(actor, Access::Create, Subject::Collection)?;
        let author = actor.require_user()?;
        self.ensure_review(path).await?;
        let comment = self
            .comments
            .create(&NewComment {
                review_id: path.review_id,
                author: author.id,
                text: text.into(),
                pub_date: self.clock.utc(),
            })
            .await?;
        info!(comment_id = comment.id.get(), review_id = path.review_id.get(), "comment created");
        Ok(comment)
    }

    async fn get(&self, actor: &Actor, path: ReviewPath, id: CommentId) -> Result<Comment, Error> {
        POLICY.authorize(actor, Access::Read, Subject::Collection)?;
        self.load(path, id).await
    }

    async fn update(
        &self,
        actor: &Actor,
        path: ReviewPath,
        id: CommentId,
        text: CommentText,
    ) -> Result<Comment, Error> {
        actor.require_user()?;
        let mut comment = self.load(path, id).await?;
        POLICY.authorize(actor, Access::Update, Subject::Owned(comment.author))?;
        comment.text = text.into();
        Ok(self.comments.update(&comment).await?)
    }

    async fn delete(&self, actor: &Actor, path: ReviewPath, id: CommentId) -> Result<(), Error> {
        actor.require_user()?;
        let comment = self.load(path, id).await?;
        POLICY.authorize(actor, Access::Delete, Subject::Owned(comment.author))?;
        if !self.comments.delete(id).await? {
            return Err(comment_not_found(id));
        }
        info!(comment_id = id.get(), "comment deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
