//! Claim ingestion pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Load**: read the claims file into memory as raw records
//! 2. **Clean**: parse amounts, ages, and dates; derive stay length and
//!    the canonical diagnosis
//! 3. **Aggregate**: compute the mean amount per diagnosis
//! 4. **Score**: score and categorize every claim against its baseline
//! 5. **Persist**: replace the stored claims table in one transaction
//!
//! Each stage completes before the next starts and runs inside its own
//! `tracing` span.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use claims_ingest::{IngestError, load_claim_table};
use claims_model::{CleanedClaim, FraudCategory, RawClaimRecord, ScoredClaim};
use claims_store::{ClaimStore, IngestRun, StoreError, compute_file_hash};
use claims_transform::{DiagnosisBaselines, clean_record, compute_baselines, score_claim};

/// Dataset-level failures. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input file does not exist.
    #[error("Claims file not found: {path}")]
    DataSourceMissing { path: PathBuf },

    /// The input file exists but could not be loaded.
    #[error("Failed to load claims from {path}")]
    Ingest {
        path: PathBuf,
        #[source]
        source: IngestError,
    },

    /// The input file could not be hashed.
    #[error("Failed to fingerprint claims file {path}")]
    Digest {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    /// The store could not be opened or written.
    #[error("Failed to persist claims to {path}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}

impl PipelineError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::DataSourceMissing { path } => {
                format!("The claims file {} does not exist.", path.display())
            }
            Self::Ingest { path, source } => {
                format!("The claims file {} could not be loaded: {source}", path.display())
            }
            Self::Digest { path, .. } => {
                format!("The claims file {} could not be read.", path.display())
            }
            Self::Persistence { source, .. } => source.user_message(),
        }
    }
}

/// Wall-clock time spent in each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTimings {
    pub load: Duration,
    pub clean: Duration,
    pub aggregate: Duration,
    pub score: Duration,
    pub persist: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.load + self.clean + self.aggregate + self.score + self.persist
    }
}

/// Outcome of a completed ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub input: PathBuf,
    pub database: PathBuf,
    /// SHA-256 of the input file.
    pub input_sha256: String,
    /// True when the previous run loaded a file with the same digest.
    pub unchanged_input: bool,
    pub rows: usize,
    /// Rows whose amount had text that could not be parsed.
    pub amount_failures: usize,
    /// Date cells with text that could not be parsed.
    pub date_failures: usize,
    /// Rows with no diagnosis text.
    pub missing_diagnosis: usize,
    /// Number of diagnosis groups with a baseline.
    pub baselines: usize,
    /// Claims per category. Every category is present.
    pub categories: BTreeMap<FraudCategory, usize>,
    pub timings: StageTimings,
}

/// Output of the clean stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedBatch {
    pub claims: Vec<CleanedClaim>,
    pub amount_failures: usize,
    pub date_failures: usize,
    pub missing_diagnosis: usize,
}

/// Runs every stage for `input` and replaces the claims stored in `database`.
pub fn run_ingest(input: &Path, database: &Path) -> Result<IngestReport, PipelineError> {
    let span = info_span!("ingest", input = %input.display(), database = %database.display());
    let _guard = span.enter();
    let mut timings = StageTimings::default();

    let stage_start = Instant::now();
    let (records, input_sha256) = info_span!("load").in_scope(|| load(input))?;
    timings.load = stage_start.elapsed();
    info!(
        rows = records.len(),
        duration_ms = timings.load.as_millis(),
        "load complete"
    );

    let stage_start = Instant::now();
    let batch = info_span!("clean").in_scope(|| clean(&records));
    timings.clean = stage_start.elapsed();
    info!(
        rows = batch.claims.len(),
        amount_failures = batch.amount_failures,
        date_failures = batch.date_failures,
        duration_ms = timings.clean.as_millis(),
        "clean complete"
    );

    let stage_start = Instant::now();
    let baselines = info_span!("aggregate").in_scope(|| aggregate(&batch.claims));
    timings.aggregate = stage_start.elapsed();
    info!(
        baselines = baselines.len(),
        duration_ms = timings.aggregate.as_millis(),
        "aggregate complete"
    );

    let CleanedBatch {
        claims,
        amount_failures,
        date_failures,
        missing_diagnosis,
    } = batch;

    let stage_start = Instant::now();
    let scored = info_span!("score").in_scope(|| score(claims, &baselines));
    timings.score = stage_start.elapsed();
    let categories = category_counts(&scored);
    info!(
        low = categories[&FraudCategory::Low],
        medium = categories[&FraudCategory::Medium],
        high = categories[&FraudCategory::High],
        duration_ms = timings.score.as_millis(),
        "score complete"
    );

    let stage_start = Instant::now();
    let run = IngestRun::new(
        input.display().to_string(),
        input_sha256.clone(),
        scored.len() as u64,
    );
    let unchanged_input = info_span!("persist").in_scope(|| persist(database, &scored, &run))?;
    timings.persist = stage_start.elapsed();
    info!(
        rows = scored.len(),
        duration_ms = timings.persist.as_millis(),
        "persist complete"
    );

    Ok(IngestReport {
        input: input.to_path_buf(),
        database: database.to_path_buf(),
        input_sha256,
        unchanged_input,
        rows: scored.len(),
        amount_failures,
        date_failures,
        missing_diagnosis,
        baselines: baselines.len(),
        categories,
        timings,
    })
}

/// Reads the claims file and fingerprints it.
pub fn load(input: &Path) -> Result<(Vec<RawClaimRecord>, String), PipelineError> {
    if !input.exists() {
        return Err(PipelineError::DataSourceMissing {
            path: input.to_path_buf(),
        });
    }

    let table = load_claim_table(input).map_err(|e| ingest_error(input, e))?;
    let records = table.records().map_err(|e| ingest_error(input, e))?;
    let digest = compute_file_hash(input).map_err(|e| PipelineError::Digest {
        path: input.to_path_buf(),
        source: e,
    })?;
    debug!(sha256 = %digest, "input fingerprinted");

    Ok((records, digest))
}

/// Cleans every record. Never fails; bad cells become null.
pub fn clean(records: &[RawClaimRecord]) -> CleanedBatch {
    let mut batch = CleanedBatch {
        claims: Vec::with_capacity(records.len()),
        ..CleanedBatch::default()
    };
    for record in records {
        let outcome = clean_record(record);
        if outcome.amount_failed {
            batch.amount_failures += 1;
        }
        batch.date_failures += usize::from(outcome.date_failures);
        if outcome.claim.diagnosis_canonical.is_empty() {
            batch.missing_diagnosis += 1;
        }
        batch.claims.push(outcome.claim);
    }
    if batch.missing_diagnosis > 0 {
        warn!(
            rows = batch.missing_diagnosis,
            "claims without a diagnosis share one blank group"
        );
    }
    batch
}

/// Computes the per-diagnosis baselines over the whole batch.
pub fn aggregate(claims: &[CleanedClaim]) -> DiagnosisBaselines {
    compute_baselines(claims)
}

/// Scores every claim against the batch baselines, preserving order.
pub fn score(claims: Vec<CleanedClaim>, baselines: &DiagnosisBaselines) -> Vec<ScoredClaim> {
    claims
        .into_iter()
        .map(|claim| score_claim(claim, baselines))
        .collect()
}

/// Replaces the stored claims. Returns whether the input matches the
/// previous run's digest.
pub fn persist(
    database: &Path,
    scored: &[ScoredClaim],
    run: &IngestRun,
) -> Result<bool, PipelineError> {
    let persistence_error = |source| PipelineError::Persistence {
        path: database.to_path_buf(),
        source,
    };
    let mut store = ClaimStore::open(database).map_err(persistence_error)?;

    let unchanged = store
        .last_run()
        .map_err(persistence_error)?
        .is_some_and(|previous| previous.matches_digest(&run.source_sha256));
    if unchanged {
        info!("input unchanged since the previous run");
    }

    store
        .replace_claims(scored, run)
        .map_err(persistence_error)?;
    Ok(unchanged)
}

fn category_counts(scored: &[ScoredClaim]) -> BTreeMap<FraudCategory, usize> {
    let mut counts: BTreeMap<FraudCategory, usize> =
        FraudCategory::ALL.into_iter().map(|c| (c, 0)).collect();
    for claim in scored {
        *counts.entry(claim.fraud_category).or_insert(0) += 1;
    }
    counts
}

fn ingest_error(path: &Path, error: IngestError) -> PipelineError {
    match error {
        IngestError::FileNotFound { path } => PipelineError::DataSourceMissing { path },
        source => PipelineError::Ingest {
            path: path.to_path_buf(),
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(diagnosis: Option<&str>, amount: &str) -> RawClaimRecord {
        RawClaimRecord {
            diagnosis: diagnosis.map(str::to_string),
            amount: Some(amount.to_string()),
            date_admitted: Some("unknown".to_string()),
            ..RawClaimRecord::default()
        }
    }

    #[test]
    fn clean_counts_failures() {
        let batch = clean(&[
            raw(Some("Malaria"), "1000"),
            raw(None, "n/a"),
            raw(Some("  "), ""),
        ]);
        assert_eq!(batch.claims.len(), 3);
        assert_eq!(batch.amount_failures, 1);
        assert_eq!(batch.date_failures, 3);
        assert_eq!(batch.missing_diagnosis, 2);
    }

    #[test]
    fn score_preserves_order_and_counts_categories() {
        let batch = clean(&[
            raw(Some("Malaria"), "1000"),
            raw(Some("Malaria"), "3000"),
            raw(Some("Typhoid"), "20000"),
        ]);
        let baselines = aggregate(&batch.claims);
        assert_eq!(baselines.get("MALARIA"), Some(&2000.0));

        let scored = score(batch.claims, &baselines);
        let amounts: Vec<Option<f64>> = scored.iter().map(|s| s.claim.amount).collect();
        assert_eq!(amounts, vec![Some(1000.0), Some(3000.0), Some(20_000.0)]);

        // Undated stays earn the same-day bonus: 10+10, 30+10, 20+10+10.
        let scores: Vec<u8> = scored.iter().map(|s| s.fraud_score).collect();
        assert_eq!(scores, vec![20, 40, 40]);
        let counts = category_counts(&scored);
        assert_eq!(counts[&FraudCategory::Low], 1);
        assert_eq!(counts[&FraudCategory::Medium], 2);
        assert_eq!(counts[&FraudCategory::High], 0);
    }

    #[test]
    fn missing_file_maps_to_data_source_missing() {
        let err = ingest_error(
            Path::new("claims.csv"),
            IngestError::FileNotFound {
                path: PathBuf::from("claims.csv"),
            },
        );
        assert!(matches!(err, PipelineError::DataSourceMissing { .. }));
        assert!(err.user_message().contains("does not exist"));
    }
}
