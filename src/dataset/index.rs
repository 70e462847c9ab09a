//! Spatial index for fast radius lookups over sites.

use rstar::{RTree, RTreeObject, AABB};

use crate::models::SiteRecord;

/// Wrapper for R-tree indexing of a site by its load position
#[derive(Debug, Clone, Copy)]
struct IndexedSite {
    position: usize,
    point: [f64; 2],
}

impl RTreeObject for IndexedSite {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

/// R-tree over site positions.
///
/// Only answers "which positions might be close"; the exact distance test
/// stays with the caller.
pub struct SiteIndex {
    tree: RTree<IndexedSite>,
}

impl SiteIndex {
    pub fn build(records: &[SiteRecord]) -> Self {
        let indexed: Vec<IndexedSite> = records
            .iter()
            .enumerate()
            .map(|(position, r)| IndexedSite {
                position,
                point: [r.x as f64, r.y as f64],
            })
            .collect();

        Self {
            tree: RTree::bulk_load(indexed),
        }
    }

    /// Load positions of every site inside the square of half-side `radius`
    /// around `(x, y)`, in ascending order.
    pub fn candidates(&self, x: i64, y: i64, radius: i64) -> Vec<usize> {
        // One meter of slack so float rounding never loses a boundary site
        let reach = (radius + 1) as f64;
        let (cx, cy) = (x as f64, y as f64);
        let envelope = AABB::from_corners([cx - reach, cy - reach], [cx + reach, cy + reach]);

        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|site| site.position)
            .collect();
        positions.sort_unstable();
        positions
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
