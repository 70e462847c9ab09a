//! Aggregated per-operator coverage returned to callers.

use serde::Serialize;
use std::collections::BTreeMap;

use super::SiteRecord;

/// Radio generations available at a site, serialized as `{"2G", "3G", "4G"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CoverageFlags {
    #[serde(rename = "2G")]
    pub g2: bool,
    #[serde(rename = "3G")]
    pub g3: bool,
    #[serde(rename = "4G")]
    pub g4: bool,
}

impl CoverageFlags {
    pub fn new(g2: bool, g3: bool, g4: bool) -> Self {
        Self { g2, g3, g4 }
    }

    /// Logical OR of each generation.
    pub fn union(self, other: CoverageFlags) -> Self {
        Self {
            g2: self.g2 || other.g2,
            g3: self.g3 || other.g3,
            g4: self.g4 || other.g4,
        }
    }
}

impl From<&SiteRecord> for CoverageFlags {
    fn from(site: &SiteRecord) -> Self {
        Self::new(site.has_2g, site.has_3g, site.has_4g)
    }
}

/// Coverage keyed by operator display name.
///
/// An empty result means no site lies within the threshold; it is never used
/// to signal a failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CoverageQueryResult {
    operators: BTreeMap<String, CoverageFlags>,
}

impl CoverageQueryResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever was recorded for `operator`.
    pub fn set(&mut self, operator: &str, flags: CoverageFlags) {
        self.operators.insert(operator.to_string(), flags);
    }

    /// OR `flags` into what was recorded for `operator`.
    pub fn merge(&mut self, operator: &str, flags: CoverageFlags) {
        self.operators
            .entry(operator.to_string())
            .and_modify(|existing| *existing = existing.union(flags))
            .or_insert(flags);
    }

    pub fn get(&self, operator: &str) -> Option<&CoverageFlags> {
        self.operators.get(operator)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CoverageFlags)> {
        self.operators.iter()
    }
}
