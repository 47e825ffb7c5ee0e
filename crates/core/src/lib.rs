//! Repurpose Hub Core - Shared types library.
//!
//! This crate provides common types used across all Repurpose Hub components:
//! - `api` - The REST backend (users and products)
//! - `cli` - Command-line tools for schema setup and seeding
//! - `integration-tests` - HTTP tests against a running server
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Record IDs, the response envelope, and user roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
