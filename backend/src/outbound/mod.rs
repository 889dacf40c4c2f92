//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: in-memory repositories for tests and database-less runs
//! - **mail**: SMTP and logging email senders
//! - **tokens**: JWT access token issuer
//!
//! Adapters translate between domain types and infrastructure
//! representations; they hold no business rules.

pub mod mail;
pub mod memory;
pub mod persistence;
pub mod tokens;
