//! Two-tier coordinator tests against the real durable store: single
//! generation per key, tier backfill, failure visibility, invalidation,
//! and claim-loser timeouts.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use vintage_cache::{decode_moic_matrix, matrix_key, MokaTier, ScenarioMatrixCache, StaleClaimReaper};
use vintage_core::errors::CacheError;
use vintage_core::models::{
    BucketDefinition, InvalidationScope, MarketParameters, MatrixConfig, MatrixStatus,
    StageTransition,
};
use vintage_core::traits::{GenerationJob, IJobQueue, IMatrixStore};
use vintage_core::VintageError;
use vintage_store::MatrixStore;

/// Records enqueued jobs; the external queue is opaque to the core.
#[derive(Default)]
struct RecordingQueue {
    jobs: Mutex<Vec<GenerationJob>>,
}

impl RecordingQueue {
    fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }
}

impl IJobQueue for RecordingQueue {
    fn enqueue(&self, job: GenerationJob) -> vintage_core::VintageResult<()> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

fn config(fund_id: &str) -> MatrixConfig {
    MatrixConfig {
        fund_id: fund_id.into(),
        taxonomy_version: 1,
        scenario_count: 16,
        bucket_definitions: vec![
            BucketDefinition { name: "write-off".into(), lower: 0.0, upper: 1.0 },
            BucketDefinition { name: "base".into(), lower: 1.0, upper: 3.0 },
            BucketDefinition { name: "outlier".into(), lower: 3.0, upper: 50.0 },
        ],
        correlation_weights: vec![0.6, 1.0, 1.3],
        recycling_enabled: false,
        market: MarketParameters {
            exit_multiple_median: 2.0,
            exit_multiple_p90: 5.0,
            failure_rate: 0.15,
            follow_on_probability: 0.5,
            hold_period_years: 8.0,
            stage_transitions: vec![StageTransition { stage: "seed".into(), graduate: 0.4 }],
        },
    }
}

struct Harness {
    cache: Arc<ScenarioMatrixCache>,
    store: Arc<MatrixStore>,
    queue: Arc<RecordingQueue>,
}

fn harness() -> Harness {
    let store = Arc::new(MatrixStore::open_in_memory().unwrap());
    let queue = Arc::new(RecordingQueue::default());
    let cache = Arc::new(ScenarioMatrixCache::new(
        store.clone(),
        Arc::new(MokaTier::new(1000)),
        queue.clone(),
    ));
    Harness { cache, store, queue }
}

// ── Generation and backfill ──────────────────────────────────────────────

#[test]
fn miss_generates_a_complete_decodable_record() {
    let h = harness();
    let cfg = config("fund-gen");
    let record = h.cache.get_or_compute(&cfg).unwrap();

    assert_eq!(record.status, MatrixStatus::Complete);
    assert!(record.is_well_formed());
    let payload = record.payload.unwrap();
    let cells = decode_moic_matrix(&payload).unwrap();
    assert_eq!(cells.len(), 16 * 3);
    assert_eq!(payload.bucket_count, 3);
    assert!(cells.iter().all(|c| c.is_finite() && *c >= 0.0));
}

#[test]
fn second_call_is_served_from_the_ephemeral_tier() {
    let h = harness();
    let cfg = config("fund-hit");
    h.cache.get_or_compute(&cfg).unwrap();
    assert_eq!(h.queue.len(), 1);

    let record = h.cache.get_or_compute(&cfg).unwrap();
    assert_eq!(record.status, MatrixStatus::Complete);
    // Ephemeral hit: no new insert, no new job.
    assert_eq!(h.queue.len(), 1);
}

// ── Cross-request idempotence ────────────────────────────────────────────

#[test]
fn concurrent_identical_configs_share_one_durable_row() {
    let h = harness();
    let cfg = config("fund-race");
    let expected_key = matrix_key(&cfg);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&h.cache);
            let cfg = cfg.clone();
            thread::spawn(move || cache.get_or_compute(&cfg).unwrap())
        })
        .collect();

    for handle in handles {
        let record = handle.join().unwrap();
        assert_eq!(record.matrix_key, expected_key);
        assert_eq!(record.status, MatrixStatus::Complete);
    }
    assert_eq!(h.store.count_by_status(MatrixStatus::Complete).unwrap(), 1);
}

// ── Failure visibility ───────────────────────────────────────────────────

#[test]
fn generation_failure_leaves_a_visible_failed_row() {
    let h = harness();
    let mut cfg = config("fund-bad");
    cfg.correlation_weights.pop(); // mismatched weights fail generation

    let err = h.cache.get_or_compute(&cfg).unwrap_err();
    assert!(matches!(
        err,
        VintageError::Cache(CacheError::GenerationFailed { .. })
    ));

    let key = matrix_key(&cfg);
    let record = h.store.get(&key).unwrap().unwrap();
    assert_eq!(record.status, MatrixStatus::Failed);
    assert!(record.payload.is_none());
}

#[test]
fn failed_rows_are_treated_as_misses_on_the_next_call() {
    let h = harness();
    let mut cfg = config("fund-retry");
    cfg.correlation_weights.pop();

    assert!(h.cache.get_or_compute(&cfg).is_err());
    assert_eq!(h.queue.len(), 1);

    // Still broken: the retry requeues, claims, and fails again — visibly.
    assert!(h.cache.get_or_compute(&cfg).is_err());
    assert_eq!(h.queue.len(), 2);
    let record = h.store.get(&matrix_key(&cfg)).unwrap().unwrap();
    assert_eq!(record.status, MatrixStatus::Failed);
}

// ── Invalidation ─────────────────────────────────────────────────────────

#[test]
fn fund_scope_invalidation_counts_both_tiers() {
    let h = harness();
    let cfg = config("fund-inv");
    h.cache.get_or_compute(&cfg).unwrap();

    let counts = h
        .cache
        .invalidate(&InvalidationScope::Fund("fund-inv".into()))
        .unwrap();
    assert_eq!(counts.ephemeral_evicted, 1);
    assert_eq!(counts.durable_marked, 1);

    let record = h.store.get(&matrix_key(&cfg)).unwrap().unwrap();
    assert_eq!(record.status, MatrixStatus::Invalidated);
}

#[test]
fn invalidated_matrices_regenerate_on_demand() {
    let h = harness();
    let cfg = config("fund-regen");
    h.cache.get_or_compute(&cfg).unwrap();
    h.cache
        .invalidate(&InvalidationScope::Matrix(matrix_key(&cfg)))
        .unwrap();

    let record = h.cache.get_or_compute(&cfg).unwrap();
    assert_eq!(record.status, MatrixStatus::Complete);
    assert!(record.is_well_formed());
}

#[test]
fn invalidate_all_reports_totals() {
    let h = harness();
    h.cache.get_or_compute(&config("fund-a")).unwrap();
    h.cache.get_or_compute(&config("fund-b")).unwrap();

    let counts = h.cache.invalidate(&InvalidationScope::All).unwrap();
    assert_eq!(counts.ephemeral_evicted, 2);
    assert_eq!(counts.durable_marked, 2);
}

// ── Claim losers ─────────────────────────────────────────────────────────

#[test]
fn loser_times_out_when_the_claimant_never_finishes() {
    let h = harness();
    let cfg = config("fund-stuck");
    let key = matrix_key(&cfg);

    // Another worker holds the claim and has gone dark.
    h.store.insert_pending(&key, &cfg.fund_id).unwrap();
    h.store.claim_processing(&key).unwrap();

    let cache = ScenarioMatrixCache::new(
        h.store.clone(),
        Arc::new(MokaTier::new(10)),
        h.queue.clone(),
    )
    .with_wait_timeout(Duration::from_millis(150));

    let err = cache.get_or_compute(&cfg).unwrap_err();
    assert!(matches!(err, VintageError::Cache(CacheError::Timeout { .. })));
}

#[test]
fn reaper_unblocks_a_dead_claim() {
    let h = harness();
    let cfg = config("fund-reap");
    let key = matrix_key(&cfg);
    h.store.insert_pending(&key, &cfg.fund_id).unwrap();
    h.store.claim_processing(&key).unwrap();
    thread::sleep(Duration::from_millis(5));

    let reaper = StaleClaimReaper::new(h.store.clone()).with_window(chrono::Duration::zero());
    let reclaimed = reaper.run().unwrap();
    assert_eq!(reclaimed, vec![key.clone()]);

    // The row is pending again; a fresh caller claims and completes it.
    let record = h.cache.get_or_compute(&cfg).unwrap();
    assert_eq!(record.status, MatrixStatus::Complete);
}
