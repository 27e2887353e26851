//! CSV header parsing, delimiter detection, and column name normalization.

/// Delimiters recognized when sniffing the header line, in tie-break order.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

/// Header line of a claims file.
#[derive(Debug, Clone)]
pub struct CsvHeaders {
    /// Column names exactly as they appear in the file (trimmed).
    pub columns: Vec<String>,
    /// Normalized names, parallel to `columns`.
    pub normalized: Vec<String>,
    /// Field delimiter detected from the header line.
    pub delimiter: u8,
}

impl CsvHeaders {
    /// Builds headers from a raw header line.
    pub fn from_line(line: &str) -> Self {
        let delimiter = detect_delimiter(line);
        let columns = parse_csv_line(line, delimiter);
        let normalized = columns.iter().map(|c| normalize_column_name(c)).collect();
        Self {
            columns,
            normalized,
            delimiter,
        }
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(String::is_empty)
    }

    /// Delimiter as a printable name.
    pub fn delimiter_name(&self) -> &'static str {
        match self.delimiter {
            b'\t' => "tab",
            b';' => "semicolon",
            b'|' => "pipe",
            _ => "comma",
        }
    }
}

/// Normalizes a column name: trimmed, lower-cased, spaces to underscores.
pub fn normalize_column_name(value: &str) -> String {
    value
        .trim()
        .trim_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

/// Picks the delimiter that splits the header line into the most fields.
///
/// Only unquoted occurrences count. Falls back to a comma.
pub fn detect_delimiter(line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0usize;
    for candidate in CANDIDATE_DELIMITERS {
        let count = count_unquoted(line, char::from(candidate));
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

fn count_unquoted(line: &str, delimiter: char) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Parses a delimited line into trimmed fields, handling quoted values.
pub fn parse_csv_line(line: &str, delimiter: u8) -> Vec<String> {
    let delimiter = char::from(delimiter);
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => {
                in_quotes = true;
            }
            '"' if in_quotes => {
                // Check for escaped quote ("")
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => {
                current.push(c);
            }
        }
    }

    fields.push(current.trim().to_string());
    fields
}
