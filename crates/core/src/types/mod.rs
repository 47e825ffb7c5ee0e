//! Core types for Repurpose Hub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod envelope;
pub mod id;
pub mod role;

pub use envelope::{Envelope, ErrorBody};
pub use id::*;
pub use role::Role;
