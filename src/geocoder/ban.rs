//! Base Adresse Nationale (api-adresse.data.gouv.fr) client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

use super::Geocoder;
use crate::config::GeocoderConfig;
use crate::error::ConfigError;
use crate::models::GlobalPoint;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// GeoJSON order: [lon, lat]
    coordinates: Vec<f64>,
}

/// Take the best-ranked feature of a search response body.
pub fn parse_search_response(body: &str) -> Option<GlobalPoint> {
    let response: SearchResponse = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            warn!("Failed to parse geocoder response: {}", e);
            return None;
        }
    };

    let feature = response.features.first()?;
    match feature.geometry.coordinates.as_slice() {
        [lon, lat, ..] => GlobalPoint::new(*lon, *lat).ok(),
        _ => None,
    }
}

fn search_url(base_url: &Url, address: &str) -> Url {
    let mut url = base_url.clone();
    url.query_pairs_mut().append_pair("q", address);
    url
}

/// Geocoder backed by the French national address search API
pub struct BanGeocoder {
    client: Client,
    base_url: Url,
    max_attempts: u32,
    retry_delay: Duration,
}

impl BanGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(concat!("netcover/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// Fetch the raw response body, retrying transport failures and 5xx.
    async fn fetch(&self, address: &str) -> Option<String> {
        let url = search_url(&self.base_url, address);

        for attempt in 1..=self.max_attempts {
            match self.client.get(url.clone()).send().await {
                Ok(response) if response.status().is_success() => {
                    return match response.text().await {
                        Ok(body) => Some(body),
                        Err(e) => {
                            warn!("Failed to read geocoder response: {}", e);
                            None
                        }
                    };
                }
                Ok(response) if response.status().is_server_error() => {
                    warn!(
                        "Geocoder returned {} (attempt {}/{})",
                        response.status(),
                        attempt,
                        self.max_attempts
                    );
                }
                Ok(response) => {
                    error!("Geocoder rejected the request with {}", response.status());
                    return None;
                }
                Err(e) if e.is_timeout() => {
                    error!(
                        "Timeout occurred while fetching coordinates for address: {} (attempt {}/{})",
                        address, attempt, self.max_attempts
                    );
                }
                Err(e) => {
                    warn!(
                        "Geocoder request failed (attempt {}/{}): {}",
                        attempt, self.max_attempts, e
                    );
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        error!(
            "Giving up on geocoding '{}' after {} attempts",
            address, self.max_attempts
        );
        None
    }
}

#[async_trait]
impl Geocoder for BanGeocoder {
    async fn geocode(&self, address: &str) -> Option<GlobalPoint> {
        info!("Fetching coordinates for address: {}", address);

        let body = self.fetch(address).await?;
        let point = parse_search_response(&body);
        match point {
            Some(p) => info!("Coordinates found: [{}, {}]", p.lon(), p.lat()),
            None => debug!("No match for address: {}", address),
        }
        point
    }
}
