//! Analysis modules.
//!
//! Aggregation of the event log into ranked recommendations.

pub mod aggregator;

pub use aggregator::*;
