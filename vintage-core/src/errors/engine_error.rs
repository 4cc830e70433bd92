/// Simulation engine errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid simulation config: {reason}")]
    InvalidConfig { reason: String },
}
