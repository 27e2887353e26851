//! Loaded claims table and extraction of raw records.

use std::path::{Path, PathBuf};

use polars::prelude::{Column, DataFrame, DataType, StringChunked};
use tracing::{debug, warn};

use claims_model::RawClaimRecord;

use crate::columns::{ClaimField, ColumnMapping};
use crate::csv::{CsvHeaders, read_csv_table};
use crate::error::Result;

/// A claims file held fully in memory.
#[derive(Debug, Clone)]
pub struct ClaimTable {
    pub path: PathBuf,
    pub frame: DataFrame,
    pub headers: CsvHeaders,
    pub mapping: ColumnMapping,
}

impl ClaimTable {
    /// Number of data rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Converts every row into a [`RawClaimRecord`].
    ///
    /// Null cells and cells of unmapped fields are `None`.
    pub fn records(&self) -> Result<Vec<RawClaimRecord>> {
        let mut columns: Vec<(ClaimField, Column)> = Vec::with_capacity(self.mapping.columns.len());
        for (field, name) in &self.mapping.columns {
            let column = self.frame.column(name)?.cast(&DataType::String)?;
            columns.push((*field, column));
        }
        let mut cells: Vec<(ClaimField, &StringChunked)> = Vec::with_capacity(columns.len());
        for (field, column) in &columns {
            cells.push((*field, column.str()?));
        }

        let mut records = Vec::with_capacity(self.height());
        for idx in 0..self.height() {
            let mut record = RawClaimRecord::default();
            for (field, values) in &cells {
                field.assign(&mut record, values.get(idx).map(str::to_string));
            }
            records.push(record);
        }
        Ok(records)
    }
}

/// Loads a claims file and maps its columns.
///
/// Fails when the file is missing or unreadable, or when the diagnosis or
/// amount column cannot be found. Other missing columns are logged and
/// treated as null.
pub fn load_claim_table(path: &Path) -> Result<ClaimTable> {
    let (frame, headers) = read_csv_table(path)?;
    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mapping = ColumnMapping::from_column_names(&names);
    mapping.ensure_required(path)?;

    for field in mapping.missing_fields() {
        warn!(
            path = %path.display(),
            field = %field,
            "column not found; values will be null"
        );
    }
    debug!(
        path = %path.display(),
        delimiter = headers.delimiter_name(),
        columns = headers.len(),
        rows = frame.height(),
        "claims file loaded"
    );

    Ok(ClaimTable {
        path: path.to_path_buf(),
        frame,
        headers,
        mapping,
    })
}
