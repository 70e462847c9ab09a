//! Netcover - mobile network coverage lookup for French addresses
//!
//! Resolves which operators offer 2G/3G/4G near a point by projecting it to
//! Lambert-93 and scanning the antenna site export for sites within 100m.
//! This library provides the shared engine for the server and lookup binaries.

pub mod config;
pub mod dataset;
pub mod error;
pub mod geocoder;
pub mod models;
pub mod operators;
pub mod projection;
pub mod resolver;

pub use dataset::{DatasetStore, SiteDataset};
pub use error::{AddressCoverageError, CoverageError, DatasetError};
pub use models::{CoverageFlags, CoverageQueryResult, GlobalPoint, PlanarPoint, SiteRecord};
pub use resolver::{coverage_for_address, AggregationPolicy, CoverageResolver};
