//! PostgreSQL adapters for the driven repository ports.
//!
//! Repositories translate between Diesel row structs (`models.rs`, `schema.rs`)
//! and domain types; neither leaks past this module. Connections come from a
//! bb8 pool managed by `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use yamdb::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/yamdb")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_catalogue_repository;
pub(crate) mod diesel_helpers;
mod diesel_pending_confirmation_repository;
mod diesel_review_repository;
mod diesel_title_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_pending_confirmation_repository::DieselPendingConfirmationRepository;
pub use diesel_review_repository::{DieselCommentRepository, DieselReviewRepository};
pub use diesel_title_repository::DieselTitleRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
