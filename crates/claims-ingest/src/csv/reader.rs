//! Claims file reading with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};

use crate::error::{IngestError, Result};

use super::header::CsvHeaders;

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;

    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read >= 2 {
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Reads the first non-blank line of a file, without a UTF-8 BOM.
fn read_header_line(path: &Path) -> Result<Option<String>> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let reader = BufReader::new(file);

    for line_result in reader.lines() {
        let line = line_result.map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let cleaned = line.strip_prefix('\u{feff}').unwrap_or(&line);
        if !cleaned.trim().is_empty() {
            return Ok(Some(cleaned.to_string()));
        }
    }

    Ok(None)
}

/// Reads the header line and detects the delimiter.
pub fn read_csv_schema(path: &Path) -> Result<CsvHeaders> {
    let Some(line) = read_header_line(path)? else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    let headers = CsvHeaders::from_line(&line);
    if headers.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    Ok(headers)
}

/// Reads a claims file into a Polars DataFrame.
///
/// Every column is loaded as text; cleaning happens downstream. Returns the
/// frame together with the sniffed header information.
pub fn read_csv_table(path: &Path) -> Result<(DataFrame, CsvHeaders)> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    check_file_size(path)?;
    validate_encoding(path)?;
    let headers = read_csv_schema(path)?;
    let delimiter = headers.delimiter;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| opts.with_separator(delimiter))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok((df, headers))
}

fn open_error(path: &Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_schema_comma() {
        let file = create_temp_csv("S/N,Diagnosis,Amount\n1,Malaria,100\n");
        let headers = read_csv_schema(file.path()).unwrap();

        assert_eq!(headers.columns, vec!["S/N", "Diagnosis", "Amount"]);
        assert_eq!(headers.delimiter, b',');
    }

    #[test]
    fn test_read_csv_schema_tab_with_bom() {
        let file = create_temp_csv("\u{feff}S/N\tDiagnosis\tAmount\n1\tMalaria\t100\n");
        let headers = read_csv_schema(file.path()).unwrap();

        assert_eq!(headers.columns, vec!["S/N", "Diagnosis", "Amount"]);
        assert_eq!(headers.delimiter, b'\t');
    }

    #[test]
    fn test_read_csv_schema_empty_file() {
        let file = create_temp_csv("");
        let result = read_csv_schema(file.path());

        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_csv_table_loads_text_columns() {
        let file = create_temp_csv("S/N,Diagnosis,Amount\n1,Malaria,\"1,200\"\n2,Typhoid,300\n");
        let (df, headers) = read_csv_table(file.path()).unwrap();

        assert_eq!(headers.len(), 3);
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        let amounts = df.column("Amount").unwrap().str().unwrap();
        assert_eq!(amounts.get(0), Some("1,200"));
        let serials = df.column("S/N").unwrap().str().unwrap();
        assert_eq!(serials.get(1), Some("2"));
    }

    #[test]
    fn test_read_csv_table_semicolon() {
        let file = create_temp_csv("diagnosis;amount\nMalaria;100\n");
        let (df, headers) = read_csv_table(file.path()).unwrap();

        assert_eq!(headers.delimiter_name(), "semicolon");
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_read_csv_table_missing_file() {
        let result = read_csv_table(Path::new("/definitely/not/here/claims.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_utf16_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xFE, b'a', 0x00]).unwrap();
        let result = validate_encoding(file.path());
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding { .. })
        ));
    }

    #[test]
    fn test_file_size_limit() {
        let file = create_temp_csv("diagnosis,amount\nMalaria,100\n");
        let result = check_file_size_with_limit(file.path(), 4);
        assert!(matches!(result, Err(IngestError::FileTooLarge { .. })));
    }
}
