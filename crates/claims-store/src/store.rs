//! Opening the claims database and replacing its contents.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, info};

use claims_model::ScoredClaim;

use crate::error::{Result, StoreError};
use crate::run::IngestRun;
use crate::schema;

/// Handle to a claims database file.
///
/// A store opened with [`ClaimStore::open`] can replace the claims table.
/// A store opened with [`ClaimStore::open_read_only`] rejects every write.
#[derive(Debug)]
pub struct ClaimStore {
    pub(crate) conn: Connection,
    path: PathBuf,
}

impl ClaimStore {
    /// Opens (creating if needed) a database for writing.
    ///
    /// Parent directories are created. The journal is switched to WAL so
    /// readers are never blocked by an ingestion in progress.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                operation: "create parent directory of",
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path).map_err(|e| open_error(path, e))?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(|e| open_error(path, e))?;
        debug!(path = %path.display(), "claims database opened");

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Opens an existing database for queries only.
    ///
    /// A missing file is reported as [`StoreError::NotInitialized`].
    pub fn open_read_only(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StoreError::NotInitialized {
                path: path.to_path_buf(),
            });
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|e| open_error(path, e))?;
        conn.execute_batch("PRAGMA query_only = ON;")
            .map_err(|e| open_error(path, e))?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Database file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once a claims table has been written.
    pub fn is_initialized(&self) -> Result<bool> {
        table_exists(&self.conn, schema::CLAIMS_TABLE).map_err(StoreError::query)
    }

    pub(crate) fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized()? {
            Ok(())
        } else {
            Err(StoreError::NotInitialized {
                path: self.path.clone(),
            })
        }
    }

    /// Replaces every stored claim and the run metadata in one transaction.
    ///
    /// Rows go into a shadow table that is renamed over the live table
    /// before commit. On any failure the transaction rolls back and the
    /// previous claims stay in place.
    pub fn replace_claims(&mut self, claims: &[ScoredClaim], run: &IngestRun) -> Result<()> {
        let tx = self.conn.transaction().map_err(StoreError::write)?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {};\n{}",
            schema::SHADOW_TABLE,
            schema::create_shadow_table()
        ))
        .map_err(StoreError::write)?;

        {
            let mut insert = tx
                .prepare(schema::INSERT_SHADOW)
                .map_err(StoreError::write)?;
            for scored in claims {
                let claim = &scored.claim;
                insert
                    .execute(params![
                        claim.sn,
                        claim.gender,
                        claim.diagnosis,
                        claim.age,
                        claim.amount,
                        claim.date_admitted_iso(),
                        claim.date_discharged_iso(),
                        claim.length_of_stay,
                        claim.diagnosis_canonical,
                        scored.diag_avg,
                        i64::from(scored.fraud_score),
                        scored.fraud_category.as_str(),
                    ])
                    .map_err(StoreError::write)?;
            }
        }

        tx.execute_batch(schema::SWAP_TABLES)
            .map_err(StoreError::write)?;
        tx.execute_batch(schema::RECREATE_RUNS)
            .map_err(StoreError::write)?;
        tx.execute(
            schema::INSERT_RUN,
            params![
                run.source_path,
                run.source_sha256,
                i64::try_from(run.row_count).unwrap_or(i64::MAX),
                run.loaded_at.to_rfc3339(),
            ],
        )
        .map_err(StoreError::write)?;

        tx.commit().map_err(StoreError::write)?;

        info!(
            path = %self.path.display(),
            rows = claims.len(),
            "claims table replaced"
        );
        Ok(())
    }
}

pub(crate) fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [name],
        |row| row.get(0),
    )
}

fn open_error(path: &Path, source: rusqlite::Error) -> StoreError {
    StoreError::Open {
        path: path.to_path_buf(),
        source,
    }
}
