//! Claims file ingestion.
//!
//! This crate loads a delimited claims file into a Polars DataFrame and maps
//! its columns onto the logical claim fields.
//!
//! # Features
//!
//! - **Delimiter detection**: comma, tab, semicolon, or pipe, sniffed from the header line
//! - **CSV Loading**: every column read as text so cleaning can degrade per cell
//! - **Column mapping**: normalized names (trimmed, lower-cased, spaces to
//!   underscores) matched against per-field aliases
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use claims_ingest::load_claim_table;
//!
//! let table = load_claim_table(Path::new("data/claims.csv"))?;
//! let records = table.records()?;
//! ```

mod columns;
mod csv;
mod error;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{
    CsvHeaders, MAX_CSV_FILE_SIZE, detect_delimiter, normalize_column_name, read_csv_schema,
    read_csv_table,
};

// === Column Mapping ===
pub use columns::{ClaimField, ColumnMapping};

// === Loaded Table ===
pub use table::{ClaimTable, load_claim_table};
