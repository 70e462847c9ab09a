use async_trait::async_trait;
use std::collections::HashMap;

use super::Geocoder;
use crate::models::GlobalPoint;

/// In-memory geocoder for tests.
#[derive(Debug, Default)]
pub struct FixtureGeocoder {
    known: HashMap<String, GlobalPoint>,
}

impl FixtureGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, point: GlobalPoint) -> Self {
        self.known.insert(address.to_string(), point);
        self
    }
}

#[async_trait]
impl Geocoder for FixtureGeocoder {
    async fn geocode(&self, address: &str) -> Option<GlobalPoint> {
        self.known.get(address).copied()
    }
}
