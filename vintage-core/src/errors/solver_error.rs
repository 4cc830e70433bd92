/// XIRR solver errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    #[error("invalid cash flow signs: {reason}")]
    InvalidCashFlowSign { reason: String },

    #[error("root not bracketed: NPV({lower}) and NPV({upper}) share sign")]
    RootNotBracketed { lower: f64, upper: f64 },

    #[error("solver failed to converge after {iterations} iterations")]
    NonConvergence { iterations: usize },
}
