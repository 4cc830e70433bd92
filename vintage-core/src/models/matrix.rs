use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::MarketParameters;

/// An exit-multiple bucket: outcomes in [lower, upper) land in this bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketDefinition {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
}

/// Normalized input to scenario matrix generation. All fields participate
/// in the matrix key hash: identical configs always hash identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixConfig {
    pub fund_id: String,
    pub taxonomy_version: u32,
    pub scenario_count: u32,
    pub bucket_definitions: Vec<BucketDefinition>,
    /// Per-bucket correlation weight applied to scenario outcomes.
    pub correlation_weights: Vec<f64>,
    pub recycling_enabled: bool,
    pub market: MarketParameters,
}

/// Lifecycle status of a scenario matrix record.
///
/// `pending → processing → {complete | failed}`; `processing` reverts to
/// `pending` only via the stale-claim reaper. `invalidated` is the soft-mark
/// terminal used by scoped invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixStatus {
    Pending,
    Processing,
    Complete,
    Failed,
    Invalidated,
}

impl MatrixStatus {
    /// Stable string form used in the durable tier's status column.
    pub fn as_str(self) -> &'static str {
        match self {
            MatrixStatus::Pending => "pending",
            MatrixStatus::Processing => "processing",
            MatrixStatus::Complete => "complete",
            MatrixStatus::Failed => "failed",
            MatrixStatus::Invalidated => "invalidated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MatrixStatus::Pending),
            "processing" => Some(MatrixStatus::Processing),
            "complete" => Some(MatrixStatus::Complete),
            "failed" => Some(MatrixStatus::Failed),
            "invalidated" => Some(MatrixStatus::Invalidated),
            _ => None,
        }
    }

    /// Whether this status ends the generation lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MatrixStatus::Complete | MatrixStatus::Failed | MatrixStatus::Invalidated
        )
    }
}

/// The full generated payload. Every field is mandatory: a record is either
/// complete with all of these present, or it has no payload at all. The type
/// makes a partially-populated payload unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixPayload {
    /// Compressed binary MOIC matrix (see `compression_codec` and
    /// `matrix_layout` for how to decode it).
    pub moic_matrix: Vec<u8>,
    /// Per-scenario state metadata (JSON).
    pub scenario_states: serde_json::Value,
    /// Bucket parameterization used for the run (JSON).
    pub bucket_params: serde_json::Value,
    pub compression_codec: String,
    pub matrix_layout: String,
    pub bucket_count: u32,
    pub optimal_scenario_count: u32,
}

/// A durable scenario matrix record.
///
/// Invariant: `status == Complete` iff `payload.is_some()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMatrixRecord {
    pub matrix_key: String,
    pub fund_id: String,
    pub status: MatrixStatus,
    pub payload: Option<MatrixPayload>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScenarioMatrixRecord {
    /// Check the completeness invariant on this record: `complete` always
    /// carries a full payload, in-flight and `failed` rows never do, and an
    /// `invalidated` row may retain the payload it completed with (the soft
    /// mark preserves the audit trail).
    pub fn is_well_formed(&self) -> bool {
        match self.status {
            MatrixStatus::Complete => self.payload.is_some(),
            MatrixStatus::Pending | MatrixStatus::Processing | MatrixStatus::Failed => {
                self.payload.is_none()
            }
            MatrixStatus::Invalidated => true,
        }
    }
}

/// Invalidation scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "scope", content = "id")]
pub enum InvalidationScope {
    All,
    Fund(String),
    Matrix(String),
}

/// Counts reported by an invalidation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationCounts {
    pub ephemeral_evicted: u64,
    pub durable_marked: u64,
}
