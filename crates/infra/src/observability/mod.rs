//! Observability infrastructure
//!
//! Structured logging through `tracing`. Library code only emits events;
//! binaries and tests install a subscriber with [`init_tracing`].

pub mod logging;

pub use logging::init_tracing;
