//! Error types surfaced by the coverage engine.

use std::path::PathBuf;

/// Failures while loading the site dataset.
///
/// Row-level problems never show up here: rejected rows are counted in the
/// [`ValidationReport`](crate::dataset::ValidationReport) instead.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("The file was not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column '{column}' not found in dataset header")]
    MissingColumn { column: &'static str },
}

/// Input-level failures of a coverage query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoverageError {
    #[error("Invalid coordinates: longitude {lon}, latitude {lat}")]
    InvalidCoordinates { lon: f64, lat: f64 },

    #[error("Invalid Lambert-93 coordinates: x {x}, y {y}")]
    InvalidPlanar { x: f64, y: f64 },

    #[error("Coordinates ({lon}, {lat}) fall outside the Lambert-93 domain")]
    OutsideProjection { lon: f64, lat: f64 },
}

/// Outcomes of an address lookup that did not produce coverage.
///
/// The three outcomes (coverage, no coordinates, nothing nearby) stay
/// distinct so the transport layer never has to guess from an empty map.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AddressCoverageError {
    #[error("Unable to get coordinates for the given address")]
    GeocodeUnavailable,

    #[error("Unable to find network coverage for the given location")]
    NoCoverageFound,

    #[error(transparent)]
    Coordinates(#[from] CoverageError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to build geocoder HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid geocoder URL '{url}': {source}")]
    GeocoderUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
