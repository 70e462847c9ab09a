//! Address geocoding.
//!
//! The resolver only needs "address in, point or nothing out"; retries,
//! timeouts and provider errors stay behind the [`Geocoder`] trait.

mod ban;
#[cfg(test)]
mod fixture;

pub use ban::{parse_search_response, BanGeocoder};
#[cfg(test)]
pub(crate) use fixture::FixtureGeocoder;

use async_trait::async_trait;

use crate::models::GlobalPoint;

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for `address`, or `None` when it cannot be located for
    /// any reason (no match, timeout, provider failure).
    async fn geocode(&self, address: &str) -> Option<GlobalPoint>;
}
