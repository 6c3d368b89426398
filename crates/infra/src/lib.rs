//! # Meridian Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The HTTP transport (`reqwest`)
//! - The resource client implementing [`meridian_core::ResourceFetcher`]
//! - Configuration loading (environment, `.env`, JSON/TOML files)
//! - Tracing subscriber initialisation
//!
//! ## Architecture
//! - Implements traits defined in `meridian-core`
//! - Depends on `meridian-common`, `meridian-domain` and `meridian-core`
//! - Contains all "impure" code (network and file I/O)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::ResourceClient;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::init_tracing;
