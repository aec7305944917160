//! # Pantry API Server Library
//!
//! HTTP transport for the Pantry services in `pantry-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Bearer token extraction
//! - `operations`: The typed operation envelope and its dispatcher
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod operations;
pub mod routes;
