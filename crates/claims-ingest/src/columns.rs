//! Mapping of normalized file columns onto logical claim fields.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use claims_model::RawClaimRecord;

use crate::csv::normalize_column_name;
use crate::error::{IngestError, Result};

/// Logical fields a claims file provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClaimField {
    Sn,
    Gender,
    Diagnosis,
    Age,
    Amount,
    DateAdmitted,
    DateDischarged,
}

impl ClaimField {
    pub const ALL: [ClaimField; 7] = [
        ClaimField::Sn,
        ClaimField::Gender,
        ClaimField::Diagnosis,
        ClaimField::Age,
        ClaimField::Amount,
        ClaimField::DateAdmitted,
        ClaimField::DateDischarged,
    ];

    /// Fields scoring cannot proceed without.
    pub const REQUIRED: [ClaimField; 2] = [ClaimField::Diagnosis, ClaimField::Amount];

    /// Normalized column names accepted for this field, in preference order.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            ClaimField::Sn => &["s/n", "sn", "s_n", "serial", "serial_no", "id"],
            ClaimField::Gender => &["gender", "sex"],
            ClaimField::Diagnosis => &["diagnosis"],
            ClaimField::Age => &["age"],
            ClaimField::Amount => &["amount", "claim_amount"],
            ClaimField::DateAdmitted => &["date_admitted", "admission_date"],
            ClaimField::DateDischarged => &["date_discharged", "discharge_date"],
        }
    }

    /// Canonical column name for this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimField::Sn => "sn",
            ClaimField::Gender => "gender",
            ClaimField::Diagnosis => "diagnosis",
            ClaimField::Age => "age",
            ClaimField::Amount => "amount",
            ClaimField::DateAdmitted => "date_admitted",
            ClaimField::DateDischarged => "date_discharged",
        }
    }

    /// Stores a cell value into the matching record slot.
    pub fn assign(&self, record: &mut RawClaimRecord, value: Option<String>) {
        let slot = match self {
            ClaimField::Sn => &mut record.sn,
            ClaimField::Gender => &mut record.gender,
            ClaimField::Diagnosis => &mut record.diagnosis,
            ClaimField::Age => &mut record.age,
            ClaimField::Amount => &mut record.amount,
            ClaimField::DateAdmitted => &mut record.date_admitted,
            ClaimField::DateDischarged => &mut record.date_discharged,
        };
        *slot = value;
    }
}

impl fmt::Display for ClaimField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which source column feeds each logical field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Field -> column name as it appears in the loaded frame.
    pub columns: BTreeMap<ClaimField, String>,
}

impl ColumnMapping {
    /// Maps frame column names onto fields.
    ///
    /// Names are normalized before matching. For each field the first alias
    /// present wins; among duplicate columns the leftmost wins.
    pub fn from_column_names<S: AsRef<str>>(names: &[S]) -> Self {
        let normalized: Vec<String> = names
            .iter()
            .map(|name| normalize_column_name(name.as_ref()))
            .collect();
        let mut columns = BTreeMap::new();
        for field in ClaimField::ALL {
            let found = field.aliases().iter().find_map(|alias| {
                normalized
                    .iter()
                    .position(|name| name == alias)
                    .map(|idx| names[idx].as_ref().to_string())
            });
            if let Some(column) = found {
                columns.insert(field, column);
            }
        }
        Self { columns }
    }

    /// Returns the source column for a field.
    pub fn column_for(&self, field: ClaimField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    /// Fields with no source column.
    pub fn missing_fields(&self) -> Vec<ClaimField> {
        ClaimField::ALL
            .into_iter()
            .filter(|field| !self.columns.contains_key(field))
            .collect()
    }

    /// Fails when a required field has no source column.
    pub fn ensure_required(&self, path: &Path) -> Result<()> {
        for field in ClaimField::REQUIRED {
            if !self.columns.contains_key(&field) {
                return Err(IngestError::MissingColumn {
                    column: field.as_str().to_string(),
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }
}
