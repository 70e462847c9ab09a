//! Core data models for the coverage engine.

pub mod coverage;
pub mod point;
pub mod site;

pub use coverage::{CoverageFlags, CoverageQueryResult};
pub use point::{GlobalPoint, PlanarPoint};
pub use site::SiteRecord;
