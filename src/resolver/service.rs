//! Proximity lookup and per-operator aggregation.

use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::dataset::{DatasetStore, SiteDataset};
use crate::error::CoverageError;
use crate::models::{CoverageFlags, CoverageQueryResult, GlobalPoint, PlanarPoint};
use crate::operators;

/// A site serves a point when it is at most this many meters away.
pub const DISTANCE_THRESHOLD_M: i64 = 100;

/// Projected points farther than this from the origin are outside any
/// meaningful use of Lambert-93.
const PLANAR_LIMIT_M: f64 = 1.0e8;

/// How several sites of the same operator within the threshold combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// The last qualifying site in load order decides the operator's flags.
    #[default]
    LastWins,
    /// Each generation is available if any qualifying site offers it.
    Any,
}

/// Fold the sites within the threshold of `(x, y)` into per-operator flags.
pub fn aggregate(
    dataset: &SiteDataset,
    x: i64,
    y: i64,
    policy: AggregationPolicy,
) -> CoverageQueryResult {
    let nearby = dataset.within(x, y, DISTANCE_THRESHOLD_M);
    debug!("Found {} sites within {}m of ({}, {})", nearby.len(), DISTANCE_THRESHOLD_M, x, y);

    let mut result = CoverageQueryResult::new();
    for site in nearby {
        let name = operators::lookup(site.operator_code);
        let flags = CoverageFlags::from(site);
        match policy {
            AggregationPolicy::LastWins => result.set(name, flags),
            AggregationPolicy::Any => result.merge(name, flags),
        }
    }
    result
}

/// Answers coverage queries against the store's live dataset.
pub struct CoverageResolver {
    store: Arc<DatasetStore>,
    policy: AggregationPolicy,
}

impl CoverageResolver {
    pub fn new(store: Arc<DatasetStore>, policy: AggregationPolicy) -> Self {
        Self { store, policy }
    }

    /// Coverage at a WGS84 point. An empty result means no site nearby.
    pub fn resolve(&self, point: GlobalPoint) -> Result<CoverageQueryResult, CoverageError> {
        let planar = PlanarPoint::from(point);
        let outside = CoverageError::OutsideProjection {
            lon: point.lon(),
            lat: point.lat(),
        };

        if planar.x.abs() > PLANAR_LIMIT_M || planar.y.abs() > PLANAR_LIMIT_M {
            return Err(outside);
        }
        let (x, y) = planar.truncated().ok_or(outside)?;

        debug!(
            "Resolving ({}, {}) -> Lambert-93 ({}, {})",
            point.lon(),
            point.lat(),
            x,
            y
        );
        Ok(aggregate(&self.store.snapshot(), x, y, self.policy))
    }

    /// Coverage at raw latitude/longitude degrees.
    pub fn resolve_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CoverageQueryResult, CoverageError> {
        self.resolve(GlobalPoint::new(lon, lat)?)
    }

    /// Coverage at a Lambert-93 point, skipping the projection.
    pub fn resolve_planar(&self, point: PlanarPoint) -> Result<CoverageQueryResult, CoverageError> {
        let (x, y) = point
            .truncated()
            .ok_or(CoverageError::InvalidPlanar {
                x: point.x,
                y: point.y,
            })?;
        Ok(aggregate(&self.store.snapshot(), x, y, self.policy))
    }

    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SiteRecord;
    use crate::projection::to_global_coordinates;
    use std::path::PathBuf;

    fn site(operator_code: i64, x: i64, y: i64, flags: (bool, bool, bool)) -> SiteRecord {
        SiteRecord {
            operator_code,
            x,
            y,
            has_2g: flags.0,
            has_3g: flags.1,
            has_4g: flags.2,
        }
    }

    fn resolver(records: &[SiteRecord], policy: AggregationPolicy) -> CoverageResolver {
        let dataset = SiteDataset::from_records(records);
        let store = DatasetStore::with_dataset(PathBuf::from("memory.csv"), dataset);
        CoverageResolver::new(Arc::new(store), policy)
    }

    #[test]
    fn test_orange_and_sfr_at_same_site() {
        let resolver = resolver(
            &[
                site(20801, 1000, 4000, (true, true, true)),
                site(20810, 1000, 4000, (false, true, true)),
            ],
            AggregationPolicy::LastWins,
        );

        let result = resolver.resolve_planar(PlanarPoint::new(1000.0, 4000.0)).unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Orange": {"2G": true, "3G": true, "4G": true},
                "SFR": {"2G": false, "3G": true, "4G": true}
            })
        );
    }

    #[test]
    fn test_resolve_through_projection() {
        let resolver = resolver(
            &[
                site(20801, 652469, 6862035, (true, true, true)),
                site(20820, 652469, 6862035, (true, false, false)),
            ],
            AggregationPolicy::LastWins,
        );

        let point = to_global_coordinates(652469.5, 6862035.5);
        let result = resolver.resolve(point).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("Orange"), Some(&CoverageFlags::new(true, true, true)));
        assert_eq!(result.get("Bouygues"), Some(&CoverageFlags::new(true, false, false)));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let resolver = resolver(
            &[
                site(20801, 1100, 4000, (true, false, false)),
                site(20810, 1000, 4101, (true, false, false)),
            ],
            AggregationPolicy::LastWins,
        );

        let result = resolver.resolve_planar(PlanarPoint::new(1000.0, 4000.0)).unwrap();
        assert!(result.get("Orange").is_some());
        assert!(result.get("SFR").is_none());
    }

    #[test]
    fn test_unknown_operator() {
        let resolver = resolver(
            &[site(99999, 1000, 4000, (true, false, true))],
            AggregationPolicy::LastWins,
        );

        let result = resolver.resolve_planar(PlanarPoint::new(1000.0, 4000.0)).unwrap();
        assert_eq!(result.get("Unknown"), Some(&CoverageFlags::new(true, false, true)));
    }

    #[test]
    fn test_no_site_nearby_is_empty() {
        let resolver = resolver(
            &[site(20801, 1000, 4000, (true, true, true))],
            AggregationPolicy::LastWins,
        );

        let result = resolver.resolve_planar(PlanarPoint::new(5000.0, 9000.0)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_last_site_in_load_order_wins() {
        let records = [
            site(20815, 1010, 4000, (true, true, true)),
            site(20815, 990, 4000, (false, false, true)),
        ];

        let result = resolver(&records, AggregationPolicy::LastWins)
            .resolve_planar(PlanarPoint::new(1000.0, 4000.0))
            .unwrap();
        assert_eq!(result.get("Free"), Some(&CoverageFlags::new(false, false, true)));

        let result = resolver(&records, AggregationPolicy::Any)
            .resolve_planar(PlanarPoint::new(1000.0, 4000.0))
            .unwrap();
        assert_eq!(result.get("Free"), Some(&CoverageFlags::new(true, true, true)));
    }

    #[test]
    fn test_projected_point_is_truncated() {
        // 1100.9 truncates to 1100, exactly 100m from the query
        let resolver = resolver(
            &[site(20801, 1000, 4000, (true, true, true))],
            AggregationPolicy::LastWins,
        );

        let result = resolver.resolve_planar(PlanarPoint::new(1100.9, 4000.0)).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_invalid_coordinates() {
        let resolver = resolver(&[], AggregationPolicy::LastWins);

        assert!(matches!(
            resolver.resolve_coordinates(f64::NAN, 2.0),
            Err(CoverageError::InvalidCoordinates { .. })
        ));
        assert!(matches!(
            resolver.resolve_coordinates(-90.0, 2.0),
            Err(CoverageError::OutsideProjection { .. })
        ));
    }

    #[test]
    fn test_fractional_rows_are_not_merged_before_aggregation() {
        let content = "Operateur;x;y;2G;3G;4G\n\
                       20801;1000.2;4000;1;1;1\n\
                       20801;1000;4000;0;0;0\n\
                       20801;1000.7;4000;1;1;1\n";
        let dataset = SiteDataset::from_reader(content.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.report().duplicates, 0);

        let store = DatasetStore::with_dataset(PathBuf::from("memory.csv"), dataset);
        let resolver = CoverageResolver::new(Arc::new(store), AggregationPolicy::LastWins);

        let result = resolver.resolve_planar(PlanarPoint::new(1000.0, 4000.0)).unwrap();
        assert_eq!(result.get("Orange"), Some(&CoverageFlags::new(true, true, true)));
    }

    #[test]
    fn test_non_finite_planar_point() {
        let resolver = resolver(&[], AggregationPolicy::LastWins);

        assert!(matches!(
            resolver.resolve_planar(PlanarPoint::new(f64::NAN, 4000.0)),
            Err(CoverageError::InvalidPlanar { .. })
        ));
    }

    #[test]
    fn test_reload_is_visible_to_resolver() {
        let resolver = resolver(&[], AggregationPolicy::LastWins);
        let planar = PlanarPoint::new(1000.0, 4000.0);
        assert!(resolver.resolve_planar(planar).unwrap().is_empty());

        resolver
            .store()
            .replace(SiteDataset::from_records(&[site(20801, 1000, 4000, (true, true, true))]));
        assert_eq!(resolver.resolve_planar(planar).unwrap().len(), 1);
    }
}
