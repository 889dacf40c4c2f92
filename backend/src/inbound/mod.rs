//! Inbound adapters translating external requests into domain calls.
//!
//! - **http**: the actix-web REST API under `/v1` and the health probes

pub mod http;
