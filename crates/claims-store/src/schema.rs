//! Table layout of the claims database.

/// Live table read by the serving layer.
pub const CLAIMS_TABLE: &str = "claims";

/// Shadow table filled during a replace before it is swapped in.
pub const SHADOW_TABLE: &str = "claims_next";

/// Column list shared by the shadow table and the live table.
const CLAIM_COLUMNS: &str = "
    sn TEXT NOT NULL,
    gender TEXT,
    diagnosis TEXT,
    age INTEGER,
    amount REAL,
    date_admitted TEXT NOT NULL,
    date_discharged TEXT NOT NULL,
    los INTEGER NOT NULL,
    diagnosis_canon TEXT NOT NULL,
    diag_avg REAL,
    fraud_score INTEGER NOT NULL,
    fraud_category TEXT NOT NULL
";

pub fn create_shadow_table() -> String {
    format!("CREATE TABLE {SHADOW_TABLE} ({CLAIM_COLUMNS});")
}

pub const INSERT_SHADOW: &str = "
    INSERT INTO claims_next (
        sn, gender, diagnosis, age, amount, date_admitted, date_discharged,
        los, diagnosis_canon, diag_avg, fraud_score, fraud_category
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
";

/// Drops the live table and renames the shadow table into its place.
pub const SWAP_TABLES: &str = "
    DROP TABLE IF EXISTS claims;
    ALTER TABLE claims_next RENAME TO claims;
    CREATE INDEX IF NOT EXISTS idx_claims_fraud_score ON claims (fraud_score);
    CREATE INDEX IF NOT EXISTS idx_claims_fraud_category ON claims (fraud_category);
";

/// Single-row table describing the latest run.
pub const RECREATE_RUNS: &str = "
    DROP TABLE IF EXISTS ingest_runs;
    CREATE TABLE ingest_runs (
        source_path TEXT NOT NULL,
        source_sha256 TEXT NOT NULL,
        row_count INTEGER NOT NULL,
        loaded_at TEXT NOT NULL
    );
";

pub const INSERT_RUN: &str = "
    INSERT INTO ingest_runs (source_path, source_sha256, row_count, loaded_at)
    VALUES (?1, ?2, ?3, ?4)
";

/// Columns selected for every claim row, `rowid` first.
pub const SELECT_CLAIM_COLUMNS: &str = "rowid, sn, gender, diagnosis, age, amount, \
    date_admitted, date_discharged, los, diagnosis_canon, diag_avg, fraud_score, fraud_category";
