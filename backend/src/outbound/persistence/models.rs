//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{
    categories, comments, email_and_codes, genre_titles, genres, reviews, titles, users,
};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: bool,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub bio: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub is_staff: bool,
}

/// Changeset struct for updating existing user records.
///
/// `treat_none_as_null` lets a profile update clear optional fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserUpdate<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub bio: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
}

/// Row struct for reading from the email_and_codes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = email_and_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PendingConfirmationRow {
    pub username: String,
    pub email: String,
    pub confirm_code: String,
    pub expire_date: DateTime<Utc>,
}

/// Insertable/changeset struct for pending confirmations.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = email_and_codes)]
pub(crate) struct NewPendingConfirmationRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub confirm_code: &'a str,
    pub expire_date: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// Row struct shared by the categories and genres tables.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct CatalogueRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub(crate) struct NewCategoryRow<'a> {
    pub name: &'a str,
    pub slug: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = genres)]
pub(crate) struct NewGenreRow<'a> {
    pub name: &'a str,
    pub slug: &'a str,
}

/// Row struct for reading from the titles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = titles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TitleRow {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = titles)]
pub(crate) struct NewTitleRow<'a> {
    pub name: &'a str,
    pub year: i32,
    pub description: Option<&'a str>,
    pub category_id: Option<i64>,
}

/// Partial title update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = titles)]
pub(crate) struct TitleUpdate<'a> {
    pub name: Option<&'a str>,
    pub year: Option<i32>,
    pub description: Option<&'a str>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = genre_titles)]
pub(crate) struct NewGenreTitleRow {
    pub genre_id: i64,
    pub title_id: i64,
}

// ---------------------------------------------------------------------------
// Reviews and comments
// ---------------------------------------------------------------------------

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: i64,
    pub title_id: i64,
    pub author_id: i64,
    pub text: String,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub title_id: i64,
    pub author_id: i64,
    pub text: &'a str,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

/// Row struct for reading from the comments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub review_id: i64,
    pub author_id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub review_id: i64,
    pub author_id: i64,
    pub text: &'a str,
    pub pub_date: DateTime<Utc>,
}
