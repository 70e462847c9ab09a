//! Address -> coordinates -> coverage.

use tracing::{error, info};

use super::CoverageResolver;
use crate::error::AddressCoverageError;
use crate::geocoder::Geocoder;
use crate::models::CoverageQueryResult;

/// Geocode `address` and resolve coverage at the resulting point.
///
/// A geocoder miss and an empty neighbourhood are reported as distinct
/// errors; a returned map is never empty.
pub async fn coverage_for_address<G>(
    geocoder: &G,
    resolver: &CoverageResolver,
    address: &str,
) -> Result<CoverageQueryResult, AddressCoverageError>
where
    G: Geocoder + ?Sized,
{
    info!("Getting network coverage for address {}", address);

    let Some(point) = geocoder.geocode(address).await else {
        error!("Unable to get coordinates for the given address");
        return Err(AddressCoverageError::GeocodeUnavailable);
    };

    let coverage = resolver.resolve(point)?;
    if coverage.is_empty() {
        error!("Unable to find network coverage for the given location");
        return Err(AddressCoverageError::NoCoverageFound);
    }

    Ok(coverage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetStore, SiteDataset};
    use crate::geocoder::FixtureGeocoder;
    use crate::models::{CoverageFlags, GlobalPoint, SiteRecord};
    use crate::projection::to_global_coordinates;
    use crate::resolver::AggregationPolicy;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn resolver() -> CoverageResolver {
        let dataset = SiteDataset::from_records(&[
            SiteRecord {
                operator_code: 20801,
                x: 652469,
                y: 6862035,
                has_2g: true,
                has_3g: true,
                has_4g: false,
            },
            SiteRecord {
                operator_code: 20810,
                x: 652500,
                y: 6862000,
                has_2g: true,
                has_3g: false,
                has_4g: false,
            },
        ]);
        let store = DatasetStore::with_dataset(PathBuf::from("memory.csv"), dataset);
        CoverageResolver::new(Arc::new(store), AggregationPolicy::LastWins)
    }

    #[tokio::test]
    async fn test_known_address() {
        let geocoder = FixtureGeocoder::new()
            .with("42 Rue papernest 75011, Paris", to_global_coordinates(652480.0, 6862020.0));

        let coverage = coverage_for_address(&geocoder, &resolver(), "42 Rue papernest 75011, Paris")
            .await
            .unwrap();

        assert_eq!(coverage.get("Orange"), Some(&CoverageFlags::new(true, true, false)));
        assert_eq!(coverage.get("SFR"), Some(&CoverageFlags::new(true, false, false)));
    }

    #[tokio::test]
    async fn test_geocoder_miss() {
        let geocoder = FixtureGeocoder::new();

        let err = coverage_for_address(&geocoder, &resolver(), "INVALID_ADDRESS_12345")
            .await
            .unwrap_err();
        assert_eq!(err, AddressCoverageError::GeocodeUnavailable);
    }

    #[tokio::test]
    async fn test_no_coverage_nearby() {
        // Somewhere in the Alps, far from both sites
        let geocoder = FixtureGeocoder::new()
            .with("Chamonix", GlobalPoint::new(6.8694, 45.9237).unwrap());

        let err = coverage_for_address(&geocoder, &resolver(), "Chamonix")
            .await
            .unwrap_err();
        assert_eq!(err, AddressCoverageError::NoCoverageFound);
    }
}
