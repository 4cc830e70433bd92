use serde::{Deserialize, Serialize};

use crate::errors::VintageResult;

/// A matrix-generation job handed to the external queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationJob {
    pub matrix_key: String,
    pub fund_id: String,
}

/// Opaque external job queue. The core only enqueues; claim/retry/backoff
/// semantics belong to the queue, not to this crate. Claim/complete
/// semantics on the cache row itself live in `IMatrixStore`.
pub trait IJobQueue: Send + Sync {
    fn enqueue(&self, job: GenerationJob) -> VintageResult<()>;
}
