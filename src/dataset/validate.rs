//! Row validation pipeline.
//!
//! Rows arrive with every required field already coerced to a number or to
//! "missing". The pipeline drops incomplete rows, then duplicates, and
//! truncates the survivors to whole-meter [`SiteRecord`]s. Rejections are
//! counted, never raised.

use hashbrown::HashSet;
use serde::Serialize;

use crate::models::SiteRecord;

/// Header names of the required columns, in field order.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Operateur", "x", "y", "2G", "3G", "4G"];

/// One source row after numeric coercion, fields in [`REQUIRED_COLUMNS`] order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawSiteRow {
    pub values: [Option<f64>; 6],
}

impl RawSiteRow {
    pub fn new(values: [Option<f64>; 6]) -> Self {
        Self { values }
    }

    /// Coerce raw cells. Anything that is not a finite number becomes missing.
    pub fn from_cells(cells: [Option<&[u8]>; 6]) -> Self {
        Self {
            values: cells.map(|cell| cell.and_then(parse_numeric)),
        }
    }

    /// All six values, or `None` if any is missing.
    fn complete(self) -> Option<[f64; 6]> {
        let [operator, x, y, g2, g3, g4] = self.values;
        Some([operator?, x?, y?, g2?, g3?, g4?])
    }
}

/// Bit patterns of the coerced values, with `-0.0` folded into `0.0`.
fn duplicate_key(values: &[f64; 6]) -> [u64; 6] {
    values.map(|v| (v + 0.0).to_bits())
}

fn to_record(values: [f64; 6]) -> SiteRecord {
    let [operator, x, y, g2, g3, g4] = values;
    SiteRecord {
        operator_code: operator.trunc() as i64,
        x: x.trunc() as i64,
        y: y.trunc() as i64,
        has_2g: g2 != 0.0,
        has_3g: g3 != 0.0,
        has_4g: g4 != 0.0,
    }
}

impl From<&SiteRecord> for RawSiteRow {
    fn from(record: &SiteRecord) -> Self {
        let flag = |b: bool| Some(if b { 1.0 } else { 0.0 });
        Self::new([
            Some(record.operator_code as f64),
            Some(record.x as f64),
            Some(record.y as f64),
            flag(record.has_2g),
            flag(record.has_3g),
            flag(record.has_4g),
        ])
    }
}

fn parse_numeric(cell: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(cell).ok()?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Counts of what the pipeline kept and why it dropped the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    pub total_rows: usize,
    pub missing_values: usize,
    pub duplicates: usize,
}

impl ValidationReport {
    pub fn accepted(&self) -> usize {
        self.total_rows - self.missing_values - self.duplicates
    }

    pub fn rejected(&self) -> usize {
        self.missing_values + self.duplicates
    }
}

/// Run the pipeline, preserving the order of accepted rows.
///
/// Duplicates are exact matches on the coerced values, checked before
/// truncation. Rows that only collapse once truncated are all kept.
pub fn validate<I>(rows: I) -> (Vec<SiteRecord>, ValidationReport)
where
    I: IntoIterator<Item = RawSiteRow>,
{
    let mut report = ValidationReport::default();
    let mut seen: HashSet<[u64; 6]> = HashSet::new();
    let mut records = Vec::new();

    for row in rows {
        report.total_rows += 1;

        let Some(values) = row.complete() else {
            report.missing_values += 1;
            continue;
        };

        if !seen.insert(duplicate_key(&values)) {
            report.duplicates += 1;
            continue;
        }

        records.push(to_record(values));
    }

    (records, report)
}
