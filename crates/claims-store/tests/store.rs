//! Integration tests for writing and querying the claims database.

use chrono::NaiveDate;
use tempfile::TempDir;

use claims_model::{CleanedClaim, FraudCategory, ScoredClaim};
use claims_store::{ClaimQuery, ClaimStore, IngestRun, StoreError};

fn claim(sn: &str, gender: &str, diagnosis: Option<&str>, amount: f64, score: u8) -> ScoredClaim {
    let category = match score {
        0..=25 => FraudCategory::Low,
        26..=75 => FraudCategory::Medium,
        _ => FraudCategory::High,
    };
    ScoredClaim {
        claim: CleanedClaim {
            sn: sn.to_string(),
            gender: Some(gender.to_string()),
            diagnosis: diagnosis.map(str::to_string),
            age: Some(40),
            amount: Some(amount),
            date_admitted: NaiveDate::from_ymd_opt(2024, 1, 2),
            date_discharged: None,
            length_of_stay: 0,
            diagnosis_canonical: diagnosis.unwrap_or_default().trim().to_uppercase(),
        },
        diag_avg: Some(amount),
        fraud_score: score,
        fraud_category: category,
    }
}

fn sample_claims() -> Vec<ScoredClaim> {
    vec![
        claim("1", "M", Some("Malaria"), 1000.0, 10),
        claim("2", "F", Some("Typhoid"), 2500.0, 30),
        claim("3", "F", Some("malaria"), 20_000.0, 80),
        claim("4", "M", Some("Fracture"), 12_000.0, 90),
        claim("5", "F", None, 500.0, 20),
    ]
}

fn loaded_store(dir: &TempDir) -> ClaimStore {
    let path = dir.path().join("db").join("claims.db");
    let mut store = ClaimStore::open(&path).unwrap();
    let claims = sample_claims();
    let run = IngestRun::new("claims.csv", "deadbeef", claims.len() as u64);
    store.replace_claims(&claims, &run).unwrap();
    store
}

#[test]
fn reading_before_ingest_is_not_initialized() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("claims.db");

    let err = ClaimStore::open_read_only(&path).unwrap_err();
    assert!(matches!(err, StoreError::NotInitialized { .. }));

    let store = ClaimStore::open(&path).unwrap();
    assert!(!store.is_initialized().unwrap());
    assert!(matches!(
        store.list_claims(&ClaimQuery::default()),
        Err(StoreError::NotInitialized { .. })
    ));
    assert!(store.last_run().unwrap().is_none());
}

#[test]
fn stored_rows_keep_their_values() {
    let dir = TempDir::new().unwrap();
    let store = loaded_store(&dir);

    let rows = store.feed(0, 100).unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].sn, "1");
    assert_eq!(rows[0].date_admitted, "2024-01-02");
    assert_eq!(rows[0].date_discharged, "");
    assert_eq!(rows[2].diagnosis_canon, "MALARIA");
    assert_eq!(rows[3].fraud_category, FraudCategory::High);
    assert_eq!(rows[4].diagnosis, None);
    assert_eq!(rows[4].diagnosis_canon, "");
    assert!(rows.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[test]
fn replacing_twice_yields_identical_rows() {
    let dir = TempDir::new().unwrap();
    let mut store = loaded_store(&dir);
    let first = store.feed(0, 100).unwrap();

    let claims = sample_claims();
    let run = IngestRun::new("claims.csv", "deadbeef", claims.len() as u64);
    store.replace_claims(&claims, &run).unwrap();
    let second = store.feed(0, 100).unwrap();

    assert_eq!(first, second);
}

#[test]
fn search_matches_diagnosis_or_gender_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let store = loaded_store(&dir);

    let page = store
        .list_claims(&ClaimQuery {
            q: Some(" MALAR ".to_string()),
            ..ClaimQuery::default()
        })
        .unwrap();
    assert_eq!(page.total, 2);
    let serials: Vec<&str> = page.claims.iter().map(|c| c.sn.as_str()).collect();
    assert_eq!(serials, vec!["1", "3"]);

    let page = store
        .list_claims(&ClaimQuery {
            q: Some("f".to_string()),
            ..ClaimQuery::default()
        })
        .unwrap();
    // Gender F (2, 3, 5) plus "Fracture" (4).
    assert_eq!(page.total, 4);
}

#[test]
fn category_filter_and_pagination() {
    let dir = TempDir::new().unwrap();
    let store = loaded_store(&dir);

    let high = store
        .list_claims(&ClaimQuery {
            category: Some(FraudCategory::High),
            ..ClaimQuery::default()
        })
        .unwrap();
    assert_eq!(high.total, 2);
    assert!(high.claims.iter().all(|c| c.fraud_score > 75));

    let page = store
        .list_claims(&ClaimQuery {
            page: 3,
            per_page: 2,
            ..ClaimQuery::default()
        })
        .unwrap();
    assert_eq!(page.pages, 3);
    assert_eq!(page.claims.len(), 1);
    assert_eq!(page.claims[0].sn, "5");

    let first = store
        .list_claims(&ClaimQuery {
            page: 0,
            per_page: 2,
            ..ClaimQuery::default()
        })
        .unwrap();
    assert_eq!(first.page, 1);
    assert_eq!(first.claims[0].sn, "1");

    let none = store
        .list_claims(&ClaimQuery {
            q: Some("cholera".to_string()),
            ..ClaimQuery::default()
        })
        .unwrap();
    assert_eq!(none.total, 0);
    assert_eq!(none.pages, 0);
    assert!(none.claims.is_empty());
}

#[test]
fn feed_honours_offset_and_limit() {
    let dir = TempDir::new().unwrap();
    let store = loaded_store(&dir);

    let rows = store.feed(1, 2).unwrap();
    let serials: Vec<&str> = rows.iter().map(|c| c.sn.as_str()).collect();
    assert_eq!(serials, vec!["2", "3"]);
    assert!(store.feed(10, 5).unwrap().is_empty());
}

#[test]
fn dashboard_aggregates() {
    let dir = TempDir::new().unwrap();
    let store = loaded_store(&dir);

    let dashboard = store.dashboard().unwrap();
    assert_eq!(dashboard.total_claims, 5);
    assert_eq!(dashboard.avg_amount, 7200.0);
    assert_eq!(dashboard.high_count, 2);
    assert_eq!(dashboard.pct_flagged, 40.0);
    assert_eq!(dashboard.distribution[&FraudCategory::Low], 2);
    assert_eq!(dashboard.distribution[&FraudCategory::Medium], 1);
    assert_eq!(dashboard.distribution[&FraudCategory::High], 2);
    let top: Vec<u8> = dashboard.top.iter().map(|c| c.fraud_score).collect();
    assert_eq!(top, vec![90, 80, 30, 20, 10]);

    let json = serde_json::to_value(&dashboard).unwrap();
    assert_eq!(json["distribution"]["High"], 2);
}

#[test]
fn dashboard_of_empty_table_is_zeroed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("claims.db");
    let mut store = ClaimStore::open(&path).unwrap();
    store
        .replace_claims(&[], &IngestRun::new("empty.csv", "00", 0))
        .unwrap();

    let dashboard = store.dashboard().unwrap();
    assert_eq!(dashboard.total_claims, 0);
    assert_eq!(dashboard.avg_amount, 0.0);
    assert_eq!(dashboard.pct_flagged, 0.0);
    assert!(dashboard.top.is_empty());
    assert!(dashboard.distribution.values().all(|count| *count == 0));
}

#[test]
fn read_only_store_sees_committed_rows_and_run() {
    let dir = TempDir::new().unwrap();
    let writer = loaded_store(&dir);

    let reader = ClaimStore::open_read_only(writer.path()).unwrap();
    assert_eq!(reader.feed(0, 100).unwrap().len(), 5);

    let run = reader.last_run().unwrap().unwrap();
    assert_eq!(run.source_path, "claims.csv");
    assert_eq!(run.row_count, 5);
    assert!(run.matches_digest("DEADBEEF"));
}

#[test]
fn failed_replace_keeps_previous_rows_and_run() {
    let dir = TempDir::new().unwrap();
    let mut store = loaded_store(&dir);
    let before = store.feed(0, 100).unwrap();

    // Another connection holding the write lock makes the swap fail.
    let blocker = rusqlite::Connection::open(store.path()).unwrap();
    blocker.execute_batch("BEGIN IMMEDIATE;").unwrap();

    let replacement = vec![claim("9", "M", Some("Cholera"), 300.0, 60)];
    let run = IngestRun::new("other.csv", "cafebabe", 1);
    let err = store.replace_claims(&replacement, &run).unwrap_err();
    assert!(matches!(err, StoreError::Write { .. }));

    blocker.execute_batch("ROLLBACK;").unwrap();
    drop(blocker);

    assert_eq!(store.feed(0, 100).unwrap(), before);
    let last = store.last_run().unwrap().unwrap();
    assert_eq!(last.source_path, "claims.csv");
    assert_eq!(last.row_count, 5);
}
