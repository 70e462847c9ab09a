//! Coverage resolution for points and addresses.

mod address;
mod service;

pub use address::coverage_for_address;
pub use service::{aggregate, AggregationPolicy, CoverageResolver, DISTANCE_THRESHOLD_M};
