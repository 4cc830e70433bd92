/// Two-tier cache coordinator errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("matrix generation failed for {matrix_key}: {reason}")]
    GenerationFailed { matrix_key: String, reason: String },

    #[error("timed out after {waited_ms}ms waiting for {matrix_key} to reach a terminal status")]
    Timeout { matrix_key: String, waited_ms: u64 },

    #[error("matrix payload codec error: {reason}")]
    Codec { reason: String },
}
