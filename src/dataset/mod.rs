//! Antenna site dataset: loading, validation and proximity queries.
//!
//! A [`SiteDataset`] is immutable once built. Refreshing it goes through
//! [`DatasetStore`], which swaps whole datasets.

mod index;
mod load;
mod store;
mod validate;

pub use index::SiteIndex;
pub use load::{open_source, read_rows};
pub use store::DatasetStore;
pub use validate::{validate, RawSiteRow, ValidationReport, REQUIRED_COLUMNS};

use chrono::{DateTime, Utc};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::DatasetError;
use crate::models::SiteRecord;

/// Validated antenna sites in load order, with a spatial index.
pub struct SiteDataset {
    records: Vec<SiteRecord>,
    index: SiteIndex,
    report: ValidationReport,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl SiteDataset {
    /// Load and validate a dataset file.
    ///
    /// A missing file is a [`DatasetError::NotFound`], never an empty dataset.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let reader = open_source(path)?;
        let mut dataset = Self::from_reader(reader)?;
        dataset.source = Some(path.to_path_buf());
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let rows = read_rows(reader)?;
        Ok(Self::from_rows(rows))
    }

    /// Build from already-coerced rows, running the validation pipeline.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawSiteRow>,
    {
        let (records, report) = validate(rows);

        if report.rejected() > 0 {
            warn!(
                "Rejected {} of {} rows ({} with missing values, {} duplicates)",
                report.rejected(),
                report.total_rows,
                report.missing_values,
                report.duplicates
            );
        }
        info!("Operator data validated: {} sites", records.len());

        let index = SiteIndex::build(&records);

        Self {
            records,
            index,
            report,
            source: None,
            loaded_at: Utc::now(),
        }
    }

    /// Build from records, which still go through deduplication.
    pub fn from_records(records: &[SiteRecord]) -> Self {
        Self::from_rows(records.iter().map(RawSiteRow::from))
    }

    /// Sites whose truncated distance to `(x, y)` is at most `threshold`
    /// meters, in load order.
    pub fn within(&self, x: i64, y: i64, threshold: i64) -> Vec<&SiteRecord> {
        self.index
            .candidates(x, y, threshold)
            .into_iter()
            .map(|position| &self.records[position])
            .filter(|site| site.distance_to(x, y) <= threshold)
            .collect()
    }

    pub fn records(&self) -> &[SiteRecord] {
        &self.records
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
