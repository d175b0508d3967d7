//! Data models for the fleet dashboard.
//!
//! Field names serialize to the camelCase keys the dashboard front end reads.

mod grid;
mod metrics;
mod vehicle;

pub use grid::*;
pub use metrics::*;
pub use vehicle::*;
