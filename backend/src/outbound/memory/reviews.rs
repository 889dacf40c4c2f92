//! Reviews and comments.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, NewComment, NewReview, ReviewRepository,
    ReviewRepositoryError,
};
use crate::domain::{
    Comment, CommentId, Review, ReviewId, TitleId, UserId, Username,
};

use super::{CommentRecord, MemoryStore, ReviewRecord, Tables};

fn author_name(tables: &Tables, author_id: i64) -> Option<Username> {
    tables
        .users
        .rows
        .get(&author_id)
        .map(|user| user.username.clone())
}

fn to_review(tables: &Tables, id: i64, record: &ReviewRecord) -> Option<Review> {
    Some(Review {
        id: ReviewId::new(id),
        title_id: TitleId::new(record.title_id),
        author: UserId::new(record.author_id),
        author_username: author_name(tables, record.author_id)?,
        text: record.text.clone(),
        score: record.score,
        pub_date: record.pub_date,
    })
}

fn to_comment(tables: &Tables, id: i64, record: &CommentRecord) -> Option<Comment> {
    Some(Comment {
        id: CommentId::new(id),
        review_id: ReviewId::new(record.review_id),
        author: UserId::new(record.author_id),
        author_username: author_name(tables, record.author_id)?,
        text: record.text.clone(),
        pub_date: record.pub_date,
    })
}

/// In-memory [`ReviewRepository`].
#[derive(Debug, Clone)]
pub struct MemoryReviewRepository {
    store: MemoryStore,
}

impl MemoryReviewRepository {
    /// Repository over `store`.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ReviewRepository for MemoryReviewRepository {
    async fn list(
        &self,
        title_id: TitleId,
        page: PageRequest,
    ) -> Result<Page<Review>, ReviewRepositoryError> {
        let tables = self.store.lock();
        let matching: Vec<Review> = tables
            .reviews
            .rows
            .iter()
            .filter(|(_, record)| record.title_id == title_id.get())
            .filter_map(|(id, record)| to_review(&tables, *id, record))
            .collect();
        Ok(Page::from_all(matching, page))
    }

    async fn find(
        &self,
        title_id: TitleId,
        id: ReviewId,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let tables = self.store.lock();
        Ok(tables
            .reviews
            .rows
            .get(&id.get())
            .filter(|record| record.title_id == title_id.get())
            .and_then(|record| to_review(&tables, id.get(), record)))
    }

    async fn create(&self, review: &NewReview) -> Result<Review, ReviewRepositoryError> {
        let mut tables = self.store.lock();
        let (title_id, author_id) = (review.title_id.get(), review.author.get());
        if !tables.titles.rows.contains_key(&title_id) || !tables.users.rows.contains_key(&author_id) {
            return Err(ReviewRepositoryError::not_found());
        }
        let taken = tables
            .reviews
            .rows
            .values()
            .any(|existing| existing.title_id == title_id && existing.author_id == author_id);
        if taken {
            return Err(ReviewRepositoryError::duplicate_review());
        }
        let record = ReviewRecord {
            title_id,
            author_id,
            text: review.text.clone(),
            score: review.score,
            pub_date: review.pub_date,
        };
        let id = tables.reviews.insert(record.clone());
        to_review(&tables, id, &record).ok_or_else(ReviewRepositoryError::not_found)
    }

    async fn update(&self, review: &Review) -> Result<Review, ReviewRepositoryError> {
        let mut tables = self.store.lock();
        let id = review.id.get();
        let record = tables
            .reviews
            .rows
            .get_mut(&id)
            .ok_or_else(ReviewRepositoryError::not_found)?;
        record.text.clone_from(&review.text);
        record.score = review.score;
        let record = record.clone();
        to_review(&tables, id, &record).ok_or_else(ReviewRepositoryError::not_found)
    }

    async fn delete(&self, id: ReviewId) -> Result<bool, ReviewRepositoryError> {
        let mut tables = self.store.lock();
        let raw = id.get();
        if tables.reviews.rows.remove(&raw).is_none() {
            return Ok(false);
        }
        tables.delete_comments_where(|comment| comment.review_id == raw);
        Ok(true)
    }
}

/// In-memory [`CommentRepository`].
#[derive(Debug, Clone)]
pub struct MemoryCommentRepository {
    store: MemoryStore,
}

impl MemoryCommentRepository {
    /// Repository over `store`.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn list(
        &self,
        review_id: ReviewId,
        page: PageRequest,
    ) -> Result<Page<Comment>, CommentRepositoryError> {
        let tables = self.store.lock();
        let matching: Vec<Comment> = tables
            .comments
            .rows
            .iter()
            .filter(|(_, record)| record.review_id == review_id.get())
            .filter_map(|(id, record)| to_comment(&tables, *id, record))
            .collect();
        Ok(Page::from_all(matching, page))
    }

    async fn find(
        &self,
        review_id: ReviewId,
        id: CommentId,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let tables = self.store.lock();
        Ok(tables
            .comments
            .rows
            .get(&id.get())
            .filter(|record| record.review_id == review_id.get())
            .and_then(|record| to_comment(&tables, id.get(), record)))
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut tables = self.store.lock();
        let (review_id, author_id) = (comment.review_id.get(), comment.author.get());
        if !tables.reviews.rows.contains_key(&review_id) || !tables.users.rows.contains_key(&author_id) {
            return Err(CommentRepositoryError::not_found());
        }
        let record = CommentRecord {
            review_id,
            author_id,
            text: comment.text.clone(),
            pub_date: comment.pub_date,
        };
        let id = tables.comments.insert(record.clone());
        to_comment(&tables, id, &record).ok_or_else(CommentRepositoryError::not_found)
    }

    async fn update(&self, comment: &Comment) -> Result<Comment, CommentRepositoryError> {
        let mut tables = self.store.lock();
        let id = comment.id.get();
        let record = tables
            .comments
            .rows
            .get_mut(&id)
            .ok_or_else(CommentRepositoryError::not_found)?;
        record.text.clone_from(&comment.text);
        let record = record.clone();
        to_comment(&tables, id, &record).ok_or_else(CommentRepositoryError::not_found)
    }

    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError> {
        let removed = self.store.lock().comments.rows.remove(&id.get());
        Ok(removed.is_some())
    }
}
