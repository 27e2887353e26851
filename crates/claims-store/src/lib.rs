//! SQLite storage for scored claims.
//!
//! The ingestion pipeline writes through [`ClaimStore::replace_claims`],
//! which swaps in a complete new claims table inside one transaction.
//! Readers open the same file with [`ClaimStore::open_read_only`] and use
//! the query methods in [`query`].
//!
//! # Tables
//!
//! - `claims`: one row per scored claim, addressed by `rowid`
//! - `ingest_runs`: a single row describing the run behind `claims`

mod error;
mod hash;
pub mod query;
mod run;
mod schema;
mod store;

pub use error::{Result, StoreError};
pub use hash::compute_file_hash;
pub use query::{
    ClaimPage, ClaimQuery, ClaimRow, DEFAULT_FEED_LIMIT, DEFAULT_PER_PAGE, Dashboard,
    TOP_SUSPICIOUS, round2,
};
pub use run::IngestRun;
pub use store::ClaimStore;
