//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int8,
        /// Unique login name (max 20 characters).
        username -> Varchar,
        /// Unique contact address (max 30 characters).
        email -> Varchar,
        /// One of `user`, `moderator`, `admin`.
        role -> Varchar,
        bio -> Nullable<Text>,
        first_name -> Nullable<Varchar>,
        last_name -> Nullable<Varchar>,
        /// Superuser flag; grants administrator rights regardless of role.
        is_staff -> Bool,
        date_joined -> Timestamptz,
    }
}

diesel::table! {
    /// Confirmation codes awaiting exchange for an access token.
    email_and_codes (id) {
        id -> Int8,
        username -> Varchar,
        /// At most one live record per address.
        email -> Varchar,
        confirm_code -> Varchar,
        expire_date -> Timestamptz,
    }
}

diesel::table! {
    categories (id) {
        id -> Int8,
        name -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    genres (id) {
        id -> Int8,
        name -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    /// Reviewable works.
    titles (id) {
        id -> Int8,
        name -> Varchar,
        year -> Int4,
        description -> Nullable<Text>,
        /// Set to NULL when the category is deleted.
        category_id -> Nullable<Int8>,
    }
}

diesel::table! {
    /// Many-to-many link between genres and titles.
    genre_titles (id) {
        id -> Int8,
        genre_id -> Int8,
        title_id -> Int8,
    }
}

diesel::table! {
    /// One review per `(author_id, title_id)` pair.
    reviews (id) {
        id -> Int8,
        title_id -> Int8,
        author_id -> Int8,
        text -> Text,
        /// Score in `1..=10`.
        score -> Int2,
        pub_date -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Int8,
        review_id -> Int8,
        author_id -> Int8,
        text -> Text,
        pub_date -> Timestamptz,
    }
}

diesel::joinable!(comments -> reviews (review_id));
diesel::joinable!(comments -> users (author_id));
diesel::joinable!(genre_titles -> genres (genre_id));
diesel::joinable!(genre_titles -> titles (title_id));
diesel::joinable!(reviews -> titles (title_id));
diesel::joinable!(reviews -> users (author_id));
diesel::joinable!(titles -> categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(
    categories,
    comments,
    email_and_codes,
    genre_titles,
    genres,
    reviews,
    titles,
    users,
);
