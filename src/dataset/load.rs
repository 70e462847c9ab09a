//! Reading the semicolon-delimited site export.

use csv::{ByteRecord, ReaderBuilder, Trim};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use super::validate::{RawSiteRow, REQUIRED_COLUMNS};
use crate::error::DatasetError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Open a dataset file, gunzipping `.gz` sources on the fly.
pub fn open_source(path: &Path) -> Result<Box<dyn Read>, DatasetError> {
    info!("Loading CSV file {}", path.display());

    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => DatasetError::NotFound {
            path: path.to_path_buf(),
        },
        _ => DatasetError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}

/// Parse every data row into a [`RawSiteRow`].
///
/// Columns are located by header name; extra columns are ignored and short
/// rows yield missing values.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawSiteRow>, DatasetError> {
    //schema

    //Operateur;x;y;2G;3G;4G
    //20801;102980;6847973;1;1;1
    //20810;102980;6847973;0;1;1

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b';')
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.byte_headers()?.clone();
    let mut indices = [0usize; 6];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| strip_bom(h) == column.as_bytes())
            .ok_or(DatasetError::MissingColumn { column })?;
    }
    debug!("Required column positions: {:?}", indices);

    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    while csv_reader.read_byte_record(&mut record)? {
        rows.push(RawSiteRow::from_cells(indices.map(|i| record.get(i))));
    }

    Ok(rows)
}

fn strip_bom(field: &[u8]) -> &[u8] {
    field.strip_prefix(UTF8_BOM).unwrap_or(field)
}
