/// Power-law exit sampler errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplerError {
    #[error("invalid calibration: p90 ({p90}) must exceed median ({median}) and both must be positive")]
    InvalidCalibration { median: f64, p90: f64 },
}
