//! Durable-tier tests: insert idempotence, claim/complete/fail lifecycle,
//! the completeness invariant, reaper races, and scoped invalidation.

use std::sync::Arc;
use std::thread;

use chrono::Duration;
use serde_json::json;

use vintage_core::models::{InvalidationScope, MatrixPayload, MatrixStatus};
use vintage_core::traits::IMatrixStore;
use vintage_store::MatrixStore;

fn payload() -> MatrixPayload {
    MatrixPayload {
        moic_matrix: vec![1, 2, 3, 4],
        scenario_states: json!([{"index": 0, "exit_multiple": 2.0}]),
        bucket_params: json!({"buckets": ["base"]}),
        compression_codec: "zstd".into(),
        matrix_layout: "row-major-f64le".into(),
        bucket_count: 3,
        optimal_scenario_count: 12,
    }
}

// ── Insert idempotence ───────────────────────────────────────────────────

#[test]
fn second_insert_is_a_no_op() {
    let store = MatrixStore::open_in_memory().unwrap();
    assert!(store.insert_pending("key-1", "fund-a").unwrap());
    assert!(!store.insert_pending("key-1", "fund-a").unwrap());
    assert_eq!(store.count_by_status(MatrixStatus::Pending).unwrap(), 1);
}

#[test]
fn concurrent_inserts_create_exactly_one_row() {
    let store = Arc::new(MatrixStore::open_in_memory().unwrap());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.insert_pending("key-race", "fund-a").unwrap())
        })
        .collect();
    let created: usize = handles.into_iter().map(|h| h.join().unwrap()).filter(|&b| b).count();
    assert_eq!(created, 1, "exactly one inserter may become the creator");
    assert_eq!(store.count_by_status(MatrixStatus::Pending).unwrap(), 1);
}

// ── Claim / complete / fail lifecycle ────────────────────────────────────

#[test]
fn lifecycle_reaches_complete_with_full_payload() {
    let store = MatrixStore::open_in_memory().unwrap();
    store.insert_pending("key-lc", "fund-a").unwrap();
    assert!(store.claim_processing("key-lc").unwrap());

    store.complete("key-lc", &payload()).unwrap();

    let record = store.get("key-lc").unwrap().unwrap();
    assert_eq!(record.status, MatrixStatus::Complete);
    assert!(record.is_well_formed());
    let p = record.payload.unwrap();
    assert_eq!(p.moic_matrix, vec![1, 2, 3, 4]);
    assert_eq!(p.compression_codec, "zstd");
    assert_eq!(p.matrix_layout, "row-major-f64le");
    assert_eq!(p.bucket_count, 3);
    assert_eq!(p.optimal_scenario_count, 12);
}

#[test]
fn only_one_claimant_wins() {
    let store = Arc::new(MatrixStore::open_in_memory().unwrap());
    store.insert_pending("key-claim", "fund-a").unwrap();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.claim_processing("key-claim").unwrap())
        })
        .collect();
    let winners = handles.into_iter().map(|h| h.join().unwrap()).filter(|&b| b).count();
    assert_eq!(winners, 1);
    assert_eq!(store.count_by_status(MatrixStatus::Processing).unwrap(), 1);
}

#[test]
fn failed_rows_keep_no_payload() {
    let store = MatrixStore::open_in_memory().unwrap();
    store.insert_pending("key-f", "fund-a").unwrap();
    store.claim_processing("key-f").unwrap();
    store.fail("key-f").unwrap();

    let record = store.get("key-f").unwrap().unwrap();
    assert_eq!(record.status, MatrixStatus::Failed);
    assert!(record.payload.is_none());
    assert!(record.is_well_formed());
}

#[test]
fn complete_requires_a_processing_claim() {
    let store = MatrixStore::open_in_memory().unwrap();
    store.insert_pending("key-nc", "fund-a").unwrap();
    // Never claimed: the conditional update must refuse.
    assert!(store.complete("key-nc", &payload()).is_err());
    let record = store.get("key-nc").unwrap().unwrap();
    assert_eq!(record.status, MatrixStatus::Pending);
}

// ── Completeness invariant ───────────────────────────────────────────────

#[test]
fn every_row_satisfies_the_completeness_invariant() {
    let store = MatrixStore::open_in_memory().unwrap();
    let keys = ["k-a", "k-b", "k-c", "k-d"];
    for key in keys {
        store.insert_pending(key, "fund-inv").unwrap();
    }
    store.claim_processing("k-b").unwrap();
    store.claim_processing("k-c").unwrap();
    store.claim_processing("k-d").unwrap();
    store.complete("k-c", &payload()).unwrap();
    store.fail("k-d").unwrap();

    for key in keys {
        let record = store.get(key).unwrap().unwrap();
        assert!(
            record.is_well_formed(),
            "{key}: status {:?} with payload {}",
            record.status,
            record.payload.is_some()
        );
    }
}

// ── Stale-claim reaper ───────────────────────────────────────────────────

#[test]
fn reaper_reverts_stale_processing_rows() {
    let store = MatrixStore::open_in_memory().unwrap();
    store.insert_pending("key-stale", "fund-a").unwrap();
    store.claim_processing("key-stale").unwrap();

    // Zero window: anything claimed before "now" is already stale.
    std::thread::sleep(std::time::Duration::from_millis(5));
    let reaped = store.reap_stale(Duration::zero()).unwrap();
    assert_eq!(reaped, vec!["key-stale".to_string()]);

    let record = store.get("key-stale").unwrap().unwrap();
    assert_eq!(record.status, MatrixStatus::Pending);
}

#[test]
fn fresh_claims_survive_the_reaper() {
    let store = MatrixStore::open_in_memory().unwrap();
    store.insert_pending("key-fresh", "fund-a").unwrap();
    store.claim_processing("key-fresh").unwrap();

    let reaped = store.reap_stale(Duration::minutes(5)).unwrap();
    assert!(reaped.is_empty());
    let record = store.get("key-fresh").unwrap().unwrap();
    assert_eq!(record.status, MatrixStatus::Processing);
}

#[test]
fn racing_reapers_cannot_both_reclaim() {
    let store = Arc::new(MatrixStore::open_in_memory().unwrap());
    store.insert_pending("key-rr", "fund-a").unwrap();
    store.claim_processing("key-rr").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.reap_stale(Duration::zero()).unwrap())
        })
        .collect();
    let total_reclaimed: usize = handles.into_iter().map(|h| h.join().unwrap().len()).sum();
    assert_eq!(total_reclaimed, 1, "a stale row is reclaimable exactly once");
}

// ── Regeneration requeue ─────────────────────────────────────────────────

#[test]
fn failed_rows_can_be_requeued_for_regeneration() {
    let store = MatrixStore::open_in_memory().unwrap();
    store.insert_pending("key-rq", "fund-a").unwrap();
    store.claim_processing("key-rq").unwrap();
    store.fail("key-rq").unwrap();

    assert!(store.requeue_terminal("key-rq").unwrap());
    let record = store.get("key-rq").unwrap().unwrap();
    assert_eq!(record.status, MatrixStatus::Pending);
    assert!(record.payload.is_none());

    // Already pending: nothing to requeue.
    assert!(!store.requeue_terminal("key-rq").unwrap());
}

#[test]
fn requeue_clears_a_retained_invalidated_payload() {
    let store = MatrixStore::open_in_memory().unwrap();
    store.insert_pending("key-ri", "fund-a").unwrap();
    store.claim_processing("key-ri").unwrap();
    store.complete("key-ri", &payload()).unwrap();
    store
        .invalidate(&InvalidationScope::Matrix("key-ri".into()))
        .unwrap();

    // Soft mark keeps the payload for audit.
    let record = store.get("key-ri").unwrap().unwrap();
    assert_eq!(record.status, MatrixStatus::Invalidated);
    assert!(record.payload.is_some());
    assert!(record.is_well_formed());

    // Requeue starts a clean lifecycle.
    assert!(store.requeue_terminal("key-ri").unwrap());
    let record = store.get("key-ri").unwrap().unwrap();
    assert_eq!(record.status, MatrixStatus::Pending);
    assert!(record.payload.is_none());
}

// ── Scoped invalidation ──────────────────────────────────────────────────

#[test]
fn fund_scope_marks_only_that_funds_rows() {
    let store = MatrixStore::open_in_memory().unwrap();
    store.insert_pending("key-f1", "fund-x").unwrap();
    store.insert_pending("key-f2", "fund-x").unwrap();
    store.insert_pending("key-g1", "fund-y").unwrap();

    let marked = store
        .invalidate(&InvalidationScope::Fund("fund-x".into()))
        .unwrap();
    assert_eq!(marked, 2);
    assert_eq!(store.count_by_status(MatrixStatus::Invalidated).unwrap(), 2);
    // Soft mark: the rows still exist for audit.
    assert_eq!(
        store.get("key-f1").unwrap().unwrap().status,
        MatrixStatus::Invalidated
    );
    assert_eq!(
        store.get("key-g1").unwrap().unwrap().status,
        MatrixStatus::Pending
    );
}

#[test]
fn matrix_scope_marks_a_single_row() {
    let store = MatrixStore::open_in_memory().unwrap();
    store.insert_pending("key-m1", "fund-z").unwrap();
    store.insert_pending("key-m2", "fund-z").unwrap();
    let marked = store
        .invalidate(&InvalidationScope::Matrix("key-m1".into()))
        .unwrap();
    assert_eq!(marked, 1);
}

#[test]
fn all_scope_marks_everything_once() {
    let store = MatrixStore::open_in_memory().unwrap();
    store.insert_pending("key-a1", "fund-p").unwrap();
    store.insert_pending("key-a2", "fund-q").unwrap();
    assert_eq!(store.invalidate(&InvalidationScope::All).unwrap(), 2);
    // Re-running marks nothing new.
    assert_eq!(store.invalidate(&InvalidationScope::All).unwrap(), 0);
}

// ── File persistence ─────────────────────────────────────────────────────

#[test]
fn completed_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matrices.db");
    {
        let store = MatrixStore::open(&path).unwrap();
        store.insert_pending("key-p", "fund-a").unwrap();
        store.claim_processing("key-p").unwrap();
        store.complete("key-p", &payload()).unwrap();
    }
    let store = MatrixStore::open(&path).unwrap();
    let record = store.get("key-p").unwrap().unwrap();
    assert_eq!(record.status, MatrixStatus::Complete);
    assert_eq!(record.payload.unwrap().moic_matrix, vec![1, 2, 3, 4]);
}
