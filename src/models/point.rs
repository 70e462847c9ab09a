//! Coordinate pairs in the two reference systems.
//!
//! The two point types are deliberately not interchangeable: going from one
//! to the other always goes through [`crate::projection`].

use serde::Serialize;

use crate::error::CoverageError;

/// WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlobalPoint {
    lon: f64,
    lat: f64,
}

impl GlobalPoint {
    /// Build a point from longitude and latitude, rejecting non-finite or
    /// out-of-range degrees.
    pub fn new(lon: f64, lat: f64) -> Result<Self, CoverageError> {
        let valid = lon.is_finite()
            && lat.is_finite()
            && (-180.0..=180.0).contains(&lon)
            && (-90.0..=90.0).contains(&lat);

        if !valid {
            return Err(CoverageError::InvalidCoordinates { lon, lat });
        }
        Ok(Self { lon, lat })
    }

    /// Inverse projection output is not range-checked.
    pub(crate) fn from_degrees(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }
}

/// Lambert-93 position in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whole meters, truncated toward zero like the dataset coordinates.
    ///
    /// Returns `None` when either axis is not finite.
    pub fn truncated(&self) -> Option<(i64, i64)> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return None;
        }
        Some((self.x.trunc() as i64, self.y.trunc() as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_point_rejects_out_of_range() {
        assert!(GlobalPoint::new(2.35, 48.85).is_ok());
        assert!(GlobalPoint::new(181.0, 48.85).is_err());
        assert!(GlobalPoint::new(2.35, -90.5).is_err());
        assert!(GlobalPoint::new(f64::NAN, 48.85).is_err());
        assert!(GlobalPoint::new(2.35, f64::INFINITY).is_err());
    }

    #[test]
    fn test_planar_truncation() {
        assert_eq!(PlanarPoint::new(1000.9, 3999.99).truncated(), Some((1000, 3999)));
        assert_eq!(PlanarPoint::new(-10.7, 5.2).truncated(), Some((-10, 5)));
        assert_eq!(PlanarPoint::new(f64::NAN, 5.2).truncated(), None);
    }
}
