use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{error, info_span};

use claims_cli::config::ClaimsConfig;
use claims_cli::pipeline::run_ingest;
use claims_store::{ClaimQuery, ClaimStore, StoreError};

use crate::cli::{FeedArgs, IngestArgs, ListArgs};
use crate::summary::{print_claim_page, print_dashboard, print_ingest_report};

/// Resolved store location: flag first, then config.
pub fn database_path(flag: Option<&Path>, config: &ClaimsConfig) -> PathBuf {
    flag.map_or_else(|| config.paths.database.clone(), Path::to_path_buf)
}

pub fn run_ingest_command(
    args: &IngestArgs,
    database: &Path,
    config: &ClaimsConfig,
) -> Result<()> {
    let input = args
        .input
        .clone()
        .unwrap_or_else(|| config.paths.input.clone());
    let report = run_ingest(&input, database).map_err(|err| {
        error!(error = %err, "ingestion failed");
        anyhow!(err.user_message())
    })?;
    print_ingest_report(&report);
    Ok(())
}

pub fn run_list(args: &ListArgs, database: &Path, config: &ClaimsConfig) -> Result<()> {
    let _span = info_span!("list").entered();
    let store = open_store(database)?;
    let query = ClaimQuery {
        q: args.search.clone(),
        category: args.category.map(Into::into),
        page: args.page,
        per_page: args.per_page.unwrap_or(config.serving.page_size),
    };
    let page = store.list_claims(&query).map_err(serving_error)?;
    print_claim_page(&page);
    Ok(())
}

pub fn run_feed(args: &FeedArgs, database: &Path, config: &ClaimsConfig) -> Result<()> {
    let _span = info_span!("feed").entered();
    let store = open_store(database)?;
    let limit = args.limit.unwrap_or(config.serving.feed_limit);
    let rows = store.feed(args.offset, limit).map_err(serving_error)?;
    let json = serde_json::to_string_pretty(&rows).context("serialize claims feed")?;
    println!("{json}");
    Ok(())
}

pub fn run_dashboard(database: &Path) -> Result<()> {
    let _span = info_span!("dashboard").entered();
    let store = open_store(database)?;
    let dashboard = store.dashboard().map_err(serving_error)?;
    let last_run = store.last_run().map_err(serving_error)?;
    print_dashboard(&dashboard, last_run.as_ref());
    Ok(())
}

fn open_store(database: &Path) -> Result<ClaimStore> {
    ClaimStore::open_read_only(database).map_err(serving_error)
}

/// Read-side failures reach the operator as their user message only.
fn serving_error(err: StoreError) -> anyhow::Error {
    anyhow!(err.user_message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_flag_overrides_config() {
        let config = ClaimsConfig::default();
        assert_eq!(
            database_path(None, &config),
            PathBuf::from("data/claims.db")
        );
        assert_eq!(
            database_path(Some(Path::new("other.db")), &config),
            PathBuf::from("other.db")
        );
    }
}
