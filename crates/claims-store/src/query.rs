//! Read-only queries behind the listing, feed, and dashboard views.

use std::collections::BTreeMap;

use rusqlite::types::{Type, Value};
use rusqlite::{OptionalExtension, Row, params_from_iter};
use serde::{Deserialize, Serialize};
use tracing::error;

use claims_model::{FraudCategory, score_from_i64};

use crate::error::{Result, StoreError};
use crate::run::IngestRun;
use crate::schema::SELECT_CLAIM_COLUMNS;
use crate::store::{ClaimStore, table_exists};

/// Claims shown per listing page unless the caller asks otherwise.
pub const DEFAULT_PER_PAGE: u64 = 10;
/// Rows returned by the feed unless the caller asks otherwise.
pub const DEFAULT_FEED_LIMIT: u64 = 100;
/// Number of claims in the dashboard's most-suspicious list.
pub const TOP_SUSPICIOUS: u64 = 10;
/// Scores above this are counted as flagged.
const FLAGGED_SCORE_FLOOR: i64 = 75;

/// One persisted claim. `id` is the SQLite rowid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRow {
    pub id: i64,
    pub sn: String,
    pub gender: Option<String>,
    pub diagnosis: Option<String>,
    pub age: Option<i64>,
    pub amount: Option<f64>,
    pub date_admitted: String,
    pub date_discharged: String,
    pub los: i64,
    pub diagnosis_canon: String,
    pub diag_avg: Option<f64>,
    pub fraud_score: u8,
    pub fraud_category: FraudCategory,
}

/// Filters and paging for [`ClaimStore::list_claims`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimQuery {
    /// Case-insensitive substring matched against diagnosis or gender.
    pub q: Option<String>,
    pub category: Option<FraudCategory>,
    /// 1-based page number. Zero is treated as the first page.
    pub page: u64,
    pub per_page: u64,
}

impl Default for ClaimQuery {
    fn default() -> Self {
        Self {
            q: None,
            category: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ClaimQuery {
    /// Search text ready for a `LIKE` pattern, or `None` when blank.
    fn search_text(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_uppercase)
    }
}

/// One page of filtered claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimPage {
    pub claims: Vec<ClaimRow>,
    pub page: u64,
    /// Total page count; zero when nothing matches.
    pub pages: u64,
    /// Number of claims matching the filters.
    pub total: u64,
    pub per_page: u64,
}

/// Aggregate view over every stored claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_claims: u64,
    /// Mean claim amount rounded to two decimals; zero with no amounts.
    pub avg_amount: f64,
    /// Claims scoring above 75.
    pub high_count: u64,
    /// `high_count` as a percentage of all claims, rounded to two decimals.
    pub pct_flagged: f64,
    /// Claims per category. Every category is present.
    pub distribution: BTreeMap<FraudCategory, u64>,
    /// Highest-scoring claims, ties broken by insertion order.
    pub top: Vec<ClaimRow>,
}

impl ClaimStore {
    /// Returns one page of claims matching the query.
    pub fn list_claims(&self, query: &ClaimQuery) -> Result<ClaimPage> {
        self.ensure_initialized()?;

        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();
        if let Some(text) = query.search_text() {
            let pattern = format!("%{text}%");
            clauses.push("(UPPER(diagnosis) LIKE ? OR UPPER(gender) LIKE ?)");
            params.push(Value::Text(pattern.clone()));
            params.push(Value::Text(pattern));
        }
        if let Some(category) = query.category {
            clauses.push("fraud_category = ?");
            params.push(Value::Text(category.as_str().to_string()));
        }
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let total: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM claims{where_clause}"),
                params_from_iter(params.iter()),
                |row| row.get(0),
            )
            .map_err(failed)?;
        let total = count_to_u64(total);

        let per_page = query.per_page.max(1);
        let page = query.page.max(1);
        let offset = (page - 1).saturating_mul(per_page);
        params.push(Value::Integer(to_sql_int(per_page)));
        params.push(Value::Integer(to_sql_int(offset)));

        let sql = format!(
            "SELECT {SELECT_CLAIM_COLUMNS} FROM claims{where_clause} ORDER BY rowid LIMIT ? OFFSET ?"
        );
        let claims = self.select_claims(&sql, &params)?;

        Ok(ClaimPage {
            claims,
            page,
            pages: total.div_ceil(per_page),
            total,
            per_page,
        })
    }

    /// Returns raw rows in insertion order.
    pub fn feed(&self, offset: u64, limit: u64) -> Result<Vec<ClaimRow>> {
        self.ensure_initialized()?;
        let sql = format!("SELECT {SELECT_CLAIM_COLUMNS} FROM claims ORDER BY rowid LIMIT ? OFFSET ?");
        self.select_claims(
            &sql,
            &[
                Value::Integer(to_sql_int(limit)),
                Value::Integer(to_sql_int(offset)),
            ],
        )
    }

    /// Computes totals, the category distribution, and the top claims.
    pub fn dashboard(&self) -> Result<Dashboard> {
        self.ensure_initialized()?;

        let (total, avg_amount): (i64, Option<f64>) = self
            .conn
            .query_row("SELECT COUNT(*), AVG(amount) FROM claims", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .map_err(failed)?;
        let high: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM claims WHERE fraud_score > ?1",
                [FLAGGED_SCORE_FLOOR],
                |row| row.get(0),
            )
            .map_err(failed)?;

        let mut distribution: BTreeMap<FraudCategory, u64> =
            FraudCategory::ALL.into_iter().map(|c| (c, 0)).collect();
        {
            let mut stmt = self
                .conn
                .prepare("SELECT fraud_category, COUNT(*) FROM claims GROUP BY fraud_category")
                .map_err(failed)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((category_at(row, 0)?, count_to_u64(row.get(1)?)))
                })
                .map_err(failed)?;
            for entry in rows {
                let (category, count) = entry.map_err(failed)?;
                distribution.insert(category, count);
            }
        }

        let top_sql = format!(
            "SELECT {SELECT_CLAIM_COLUMNS} FROM claims ORDER BY fraud_score DESC, rowid ASC LIMIT ?"
        );
        let top = self.select_claims(&top_sql, &[Value::Integer(to_sql_int(TOP_SUSPICIOUS))])?;

        let total_claims = count_to_u64(total);
        let high_count = count_to_u64(high);
        let pct_flagged = if total_claims == 0 {
            0.0
        } else {
            round2(high_count as f64 / total_claims as f64 * 100.0)
        };

        Ok(Dashboard {
            total_claims,
            avg_amount: round2(avg_amount.unwrap_or(0.0)),
            high_count,
            pct_flagged,
            distribution,
            top,
        })
    }

    /// Metadata for the run that produced the live table, if any.
    pub fn last_run(&self) -> Result<Option<IngestRun>> {
        if !table_exists(&self.conn, "ingest_runs").map_err(failed)? {
            return Ok(None);
        }
        self.conn
            .query_row(
                "SELECT source_path, source_sha256, row_count, loaded_at FROM ingest_runs LIMIT 1",
                [],
                |row| {
                    let loaded_at: String = row.get(3)?;
                    let loaded_at = chrono::DateTime::parse_from_rfc3339(&loaded_at)
                        .map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
                        })?
                        .with_timezone(&chrono::Utc);
                    Ok(IngestRun {
                        source_path: row.get(0)?,
                        source_sha256: row.get(1)?,
                        row_count: count_to_u64(row.get(2)?),
                        loaded_at,
                    })
                },
            )
            .optional()
            .map_err(failed)
    }

    fn select_claims(&self, sql: &str, params: &[Value]) -> Result<Vec<ClaimRow>> {
        let mut stmt = self.conn.prepare(sql).map_err(failed)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), claim_from_row)
            .map_err(failed)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(failed)
    }
}

fn claim_from_row(row: &Row<'_>) -> rusqlite::Result<ClaimRow> {
    let score: i64 = row.get(11)?;
    let fraud_score = score_from_i64(score)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(11, Type::Integer, Box::new(e)))?;
    Ok(ClaimRow {
        id: row.get(0)?,
        sn: row.get(1)?,
        gender: row.get(2)?,
        diagnosis: row.get(3)?,
        age: row.get(4)?,
        amount: row.get(5)?,
        date_admitted: row.get(6)?,
        date_discharged: row.get(7)?,
        los: row.get(8)?,
        diagnosis_canon: row.get(9)?,
        diag_avg: row.get(10)?,
        fraud_score,
        fraud_category: category_at(row, 12)?,
    })
}

fn category_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<FraudCategory> {
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Logs the driver error and wraps it as an opaque query failure.
fn failed(source: rusqlite::Error) -> StoreError {
    error!(error = %source, "claims query failed");
    StoreError::query(source)
}

fn count_to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Rounds to two decimals, sending exact halves to the even cent.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
