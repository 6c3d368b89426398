//! # Meridian Domain
//!
//! Business domain types and models for the Meridian analytics API client.
//!
//! This crate contains:
//! - Credential, resource envelope and segments tree types
//! - Domain error types (classified remote failures, structural errors)
//! - Configuration structures
//! - The wire decoder for tagged-object tree pages
//!
//! ## Architecture
//! - No dependencies on other Meridian crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod wire;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
