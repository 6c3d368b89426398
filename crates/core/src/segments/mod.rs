//! Segments tree aggregation
//!
//! A segments tree node lists its children across several pages. The
//! [`aggregator`] walks the page chain and merges the children into one node.

pub mod aggregator;

pub use aggregator::{AggregationError, PageAggregator};
