//! Error taxonomy tests: umbrella conversions and aggregated display.

use vintage_core::errors::{
    EngineError, SamplerError, SolverError, ValidationError, VintageError, Violation,
};
use vintage_core::models::MetricType;

#[test]
fn solver_error_converts_into_umbrella() {
    let err: VintageError = SolverError::RootNotBracketed { lower: -0.99, upper: 10.0 }.into();
    assert!(matches!(err, VintageError::Solver(_)));
    assert!(err.to_string().contains("root not bracketed"));
}

#[test]
fn sampler_error_reports_both_calibration_points() {
    let err = SamplerError::InvalidCalibration { median: 2.0, p90: 1.5 };
    let msg = err.to_string();
    assert!(msg.contains('2') && msg.contains("1.5"));
}

#[test]
fn validation_error_displays_every_violation() {
    let err = ValidationError::Invalid {
        violations: vec![
            Violation {
                metric: MetricType::Irr,
                check: "monotonicity",
                detail: "p5 (0.5) > p25 (0.15)".into(),
            },
            Violation {
                metric: MetricType::Multiple,
                check: "sign",
                detail: "min is -0.2".into(),
            },
        ],
    };
    let msg = err.to_string();
    assert!(msg.contains("monotonicity"));
    assert!(msg.contains("sign"));
    assert_eq!(err.violations().len(), 2);
}

#[test]
fn engine_error_carries_reason() {
    let err = EngineError::InvalidConfig { reason: "num_trials must be positive".into() };
    assert!(err.to_string().contains("num_trials"));
}
