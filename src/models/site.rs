use serde::Serialize;

/// One validated antenna site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SiteRecord {
    pub operator_code: i64,
    /// Lambert-93 easting in whole meters
    pub x: i64,
    /// Lambert-93 northing in whole meters
    pub y: i64,
    pub has_2g: bool,
    pub has_3g: bool,
    pub has_4g: bool,
}

impl SiteRecord {
    /// Euclidean distance to `(x, y)`, truncated to whole meters.
    pub fn distance_to(&self, x: i64, y: i64) -> i64 {
        let dx = self.x as f64 - x as f64;
        let dy = self.y as f64 - y as f64;
        (dx * dx + dy * dy).sqrt() as i64
    }
}
