//! CSV reading utilities.

mod header;
mod reader;

pub use header::{CsvHeaders, detect_delimiter, normalize_column_name};
pub use reader::{MAX_CSV_FILE_SIZE, read_csv_schema, read_csv_table};
