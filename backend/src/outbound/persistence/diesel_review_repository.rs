//! PostgreSQL-backed review and comment repositories.
//!
//! Both read paths join `users` so the author's username travels with the
//! row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, NewComment, NewReview, ReviewRepository,
    ReviewRepositoryError,
};
use crate::domain::{
    Comment, CommentId, Review, ReviewId, Score, TitleId, UserId, Username,
};

use super::diesel_helpers::{
    count_to_total, is_connection_error, is_foreign_key_violation, limit_offset,
    map_diesel_error_message, map_pool_error_message, unique_violation,
};
use super::models::{CommentRow, NewCommentRow, NewReviewRow, ReviewRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, reviews, users};

/// Diesel-backed implementation of the [`ReviewRepository`] port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_review_pool_error(error: PoolError) -> ReviewRepositoryError {
    ReviewRepositoryError::connection(map_pool_error_message(error))
}

fn map_review_error(error: diesel::result::Error) -> ReviewRepositoryError {
    if unique_violation(&error).is_some() {
        return ReviewRepositoryError::duplicate_review();
    }
    // The title or author vanished between the service lookup and the insert.
    if is_foreign_key_violation(&error) {
        return ReviewRepositoryError::not_found();
    }
    if is_connection_error(&error) {
        return ReviewRepositoryError::connection(map_diesel_error_message(error, "reviews"));
    }
    ReviewRepositoryError::query(map_diesel_error_message(error, "reviews"))
}

fn row_to_review((row, username): (ReviewRow, String)) -> Result<Review, ReviewRepositoryError> {
    let id = row.id;
    Ok(Review {
        id: ReviewId::new(id),
        title_id: TitleId::new(row.title_id),
        author: UserId::new(row.author_id),
        author_username: Username::new(username).map_err(|err| {
            ReviewRepositoryError::query(format!("invalid author of review {id}: {err}"))
        })?,
        text: row.text,
        score: Score::new(i64::from(row.score)).map_err(|err| {
            ReviewRepositoryError::query(format!("invalid score of review {id}: {err}"))
        })?,
        pub_date: row.pub_date,
    })
}

async fn load_review(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<Option<Review>, ReviewRepositoryError> {
    reviews::table
        .inner_join(users::table)
        .filter(reviews::id.eq(id))
        .select((ReviewRow::as_select(), users::username))
        .first::<(ReviewRow, String)>(conn)
        .await
        .optional()
        .map_err(map_review_error)?
        .map(row_to_review)
        .transpose()
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn list(
        &self,
        title_id: TitleId,
        page: PageRequest,
    ) -> Result<Page<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_review_pool_error)?;
        let (limit, offset) = limit_offset(page);
        let total: i64 = reviews::table
            .filter(reviews::title_id.eq(title_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_review_error)?;
        let rows: Vec<(ReviewRow, String)> = reviews::table
            .inner_join(users::table)
            .filter(reviews::title_id.eq(title_id.get()))
            .order(reviews::id.asc())
            .limit(limit)
            .offset(offset)
            .select((ReviewRow::as_select(), users::username))
            .load(&mut conn)
            .await
            .map_err(map_review_error)?;
        let items = rows
            .into_iter()
            .map(row_to_review)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, count_to_total(total)))
    }

    async fn find(
        &self,
        title_id: TitleId,
        id: ReviewId,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_review_pool_error)?;
        Ok(load_review(&mut conn, id.get())
            .await?
            .filter(|review| review.title_id == title_id))
    }

    async fn create(&self, review: &NewReview) -> Result<Review, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_review_pool_error)?;
        let id: i64 = diesel::insert_into(reviews::table)
            .values(&NewReviewRow {
                title_id: review.title_id.get(),
                author_id: review.author.get(),
                text: &review.text,
                score: review.score.get(),
                pub_date: review.pub_date,
            })
            .returning(reviews::id)
            .get_result(&mut conn)
            .await
            .map_err(map_review_error)?;
        load_review(&mut conn, id)
            .await?
            .ok_or_else(ReviewRepositoryError::not_found)
    }

    async fn update(&self, review: &Review) -> Result<Review, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_review_pool_error)?;
        let updated = diesel::update(reviews::table.find(review.id.get()))
            .set((
                reviews::text.eq(&review.text),
                reviews::score.eq(review.score.get()),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_review_error)?;
        if updated == 0 {
            return Err(ReviewRepositoryError::not_found());
        }
        load_review(&mut conn, review.id.get())
            .await?
            .ok_or_else(ReviewRepositoryError::not_found)
    }

    async fn delete(&self, id: ReviewId) -> Result<bool, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_review_pool_error)?;
        let deleted = diesel::delete(reviews::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_review_error)?;
        Ok(deleted > 0)
    }
}

/// Diesel-backed implementation of the [`CommentRepository`] port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_comment_pool_error(error: PoolError) -> CommentRepositoryError {
    CommentRepositoryError::connection(map_pool_error_message(error))
}

fn map_comment_error(error: diesel::result::Error) -> CommentRepositoryError {
    if is_foreign_key_violation(&error) {
        return CommentRepositoryError::not_found();
    }
    if is_connection_error(&error) {
        return CommentRepositoryError::connection(map_diesel_error_message(error, "comments"));
    }
    CommentRepositoryError::query(map_diesel_error_message(error, "comments"))
}

fn row_to_comment((row, username): (CommentRow, String)) -> Result<Comment, CommentRepositoryError> {
    let id = row.id;
    Ok(Comment {
        id: CommentId::new(id),
        review_id: ReviewId::new(row.review_id),
        author: UserId::new(row.author_id),
        author_username: Username::new(username).map_err(|err| {
            CommentRepositoryError::query(format!("invalid author of comment {id}: {err}"))
        })?,
        text: row.text,
        pub_date: row.pub_date,
    })
}

async fn load_comment(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<Option<Comment>, CommentRepositoryError> {
    comments::table
        .inner_join(users::table)
        .filter(comments::id.eq(id))
        .select((CommentRow::as_select(), users::username))
        .first::<(CommentRow, String)>(conn)
        .await
        .optional()
        .map_err(map_comment_error)?
        .map(row_to_comment)
        .transpose()
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn list(
        &self,
        review_id: ReviewId,
        page: PageRequest,
    ) -> Result<Page<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_comment_pool_error)?;
        let (limit, offset) = limit_offset(page);
        let total: i64 = comments::table
            .filter(comments::review_id.eq(review_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_comment_error)?;
        let rows: Vec<(CommentRow, String)> = comments::table
            .inner_join(users::table)
            .filter(comments::review_id.eq(review_id.get()))
            .order(comments::id.asc())
            .limit(limit)
            .offset(offset)
            .select((CommentRow::as_select(), users::username))
            .load(&mut conn)
            .await
            .map_err(map_comment_error)?;
        let items = rows
            .into_iter()
            .map(row_to_comment)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, count_to_total(total)))
    }

    async fn find(
        &self,
        review_id: ReviewId,
        id: CommentId,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_comment_pool_error)?;
        Ok(load_comment(&mut conn, id.get())
            .await?
            .filter(|comment| comment.review_id == review_id))
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_comment_pool_error)?;
        let id: i64 = diesel::insert_into(comments::table)
            .values(&NewCommentRow {
                review_id: comment.review_id.get(),
                author_id: comment.author.get(),
                text: &comment.text,
                pub_date: comment.pub_date,
            })
            .returning(comments::id)
            .get_result(&mut conn)
            .await
            .map_err(map_comment_error)?;
        load_comment(&mut conn, id)
            .await?
            .ok_or_else(CommentRepositoryError::not_found)
    }

    async fn update(&self, comment: &Comment) -> Result<Comment, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_comment_pool_error)?;
        let updated = diesel::update(comments::table.find(comment.id.get()))
            .set(comments::text.eq(&comment.text))
            .execute(&mut conn)
            .await
            .map_err(map_comment_error)?;
        if updated == 0 {
            return Err(CommentRepositoryError::not_found());
        }
        load_comment(&mut conn, comment.id.get())
            .await?
            .ok_or_else(CommentRepositoryError::not_found)
    }

    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_comment_pool_error)?;
        let deleted = diesel::delete(comments::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_comment_error)?;
        Ok(deleted > 0)
    }
}
