//! # Pantry Shared Library
//!
//! Domain types, persistence and business services for the Pantry list
//! backend. The HTTP layer lives in `pantry-api`; everything here is
//! transport-agnostic.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, JWT tokens and role checks
//! - `db`: connection pool and embedded migrations
//! - `error`: the `ServiceError` taxonomy
//! - `inputs`: validated operation arguments
//! - `models`: rows and their queries
//! - `services`: users, owned resources, list items and auth
//! - `seed`: destructive reset and repopulate

pub mod auth;
pub mod db;
pub mod error;
pub mod inputs;
pub mod models;
pub mod seed;
pub mod services;

/// Current version of the Pantry shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
