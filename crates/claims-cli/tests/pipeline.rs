//! Integration tests for the ingestion pipeline.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use claims_cli::pipeline::{PipelineError, run_ingest};
use claims_model::FraudCategory;
use claims_store::{ClaimQuery, ClaimStore};

const CLAIMS_CSV: &str = "S/N,Gender,Diagnosis,Age,Amount,Date Admitted,Date Discharged\n\
    1,M,Malaria,34,\"₦1,000\",01/02/2024,01/05/2024\n\
    2,F,malaria ,29,3000,2024-01-10,2024-01-10\n\
    3,F,Typhoid,51,20000,2024-02-01,2024-03-15\n\
    4,M,,40,500,,\n\
    5,M,Fracture,22,n/a,2024-01-01,2023-12-25\n";

fn write_input(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("claims.csv");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn ingest_scores_and_stores_every_row() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, CLAIMS_CSV);
    let database = dir.path().join("out").join("claims.db");

    let report = run_ingest(&input, &database).unwrap();
    assert_eq!(report.rows, 5);
    assert_eq!(report.amount_failures, 1);
    assert_eq!(report.date_failures, 0);
    assert_eq!(report.missing_diagnosis, 1);
    // MALARIA, TYPHOID, and the blank group; FRACTURE has no amounts.
    assert_eq!(report.baselines, 3);
    assert_eq!(report.categories[&FraudCategory::Low], 2);
    assert_eq!(report.categories[&FraudCategory::Medium], 3);
    assert_eq!(report.categories[&FraudCategory::High], 0);
    assert!(!report.unchanged_input);
    assert_eq!(report.input_sha256.len(), 64);

    let store = ClaimStore::open_read_only(&database).unwrap();
    let rows = store.feed(0, 100).unwrap();
    let scores: Vec<u8> = rows.iter().map(|row| row.fraud_score).collect();
    assert_eq!(scores, vec![10, 40, 40, 30, 20]);

    assert_eq!(rows[0].amount, Some(1000.0));
    assert_eq!(rows[0].diag_avg, Some(2000.0));
    assert_eq!(rows[0].date_admitted, "2024-01-02");
    assert_eq!(rows[0].los, 3);
    assert_eq!(rows[1].diagnosis_canon, "MALARIA");
    assert_eq!(rows[2].los, 43);
    assert_eq!(rows[3].diagnosis_canon, "");
    assert_eq!(rows[3].date_admitted, "");
    assert_eq!(rows[4].amount, None);
    assert_eq!(rows[4].diag_avg, None);
    assert_eq!(rows[4].los, -7);
}

#[test]
fn reingesting_unchanged_input_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, CLAIMS_CSV);
    let database = dir.path().join("claims.db");

    run_ingest(&input, &database).unwrap();
    let first = ClaimStore::open_read_only(&database)
        .unwrap()
        .feed(0, 100)
        .unwrap();

    let report = run_ingest(&input, &database).unwrap();
    assert!(report.unchanged_input);
    let second = ClaimStore::open_read_only(&database)
        .unwrap()
        .feed(0, 100)
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn missing_input_is_data_source_missing_and_keeps_store() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, CLAIMS_CSV);
    let database = dir.path().join("claims.db");
    run_ingest(&input, &database).unwrap();

    let err = run_ingest(&dir.path().join("absent.csv"), &database).unwrap_err();
    assert!(matches!(err, PipelineError::DataSourceMissing { .. }));

    let store = ClaimStore::open_read_only(&database).unwrap();
    assert_eq!(store.feed(0, 100).unwrap().len(), 5);
}

#[test]
fn missing_required_column_aborts() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "S/N,Diagnosis\n1,Malaria\n");
    let database = dir.path().join("claims.db");

    let err = run_ingest(&input, &database).unwrap_err();
    assert!(matches!(err, PipelineError::Ingest { .. }));
    assert!(!database.exists());
}

#[test]
fn header_only_input_produces_empty_run() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "Diagnosis,Amount\n");
    let database = dir.path().join("claims.db");

    let report = run_ingest(&input, &database).unwrap();
    assert_eq!(report.rows, 0);

    let store = ClaimStore::open_read_only(&database).unwrap();
    let dashboard = store.dashboard().unwrap();
    assert_eq!(dashboard.total_claims, 0);
    let page = store.list_claims(&ClaimQuery::default()).unwrap();
    assert_eq!(page.total, 0);
}

#[test]
fn listing_after_ingest_filters_by_category() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, CLAIMS_CSV);
    let database = dir.path().join("claims.db");
    run_ingest(&input, &database).unwrap();

    let store = ClaimStore::open_read_only(&database).unwrap();
    let page = store
        .list_claims(&ClaimQuery {
            category: Some(FraudCategory::Low),
            ..ClaimQuery::default()
        })
        .unwrap();
    let serials: Vec<&str> = page.claims.iter().map(|row| row.sn.as_str()).collect();
    assert_eq!(serials, vec!["1", "5"]);
}
