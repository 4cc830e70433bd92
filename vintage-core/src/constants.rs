/// Vintage system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Day-count denominator for annualizing irregular cash flows.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Newton-Raphson starting rate.
pub const NEWTON_INITIAL_GUESS: f64 = 0.1;

/// Newton-Raphson iteration cap before falling back to Brent.
pub const NEWTON_MAX_ITERATIONS: usize = 100;

/// Convergence tolerance on |NPV(rate)|.
pub const NPV_TOLERANCE: f64 = 1e-10;

/// Brent bracket lower bound (a rate of -100% is a pole of the NPV).
pub const BRENT_BRACKET_LOW: f64 = -0.99;

/// Brent bracket upper bound (initial; expanded geometrically when the
/// root lies above it, e.g. extreme short-horizon multiples).
pub const BRENT_BRACKET_HIGH: f64 = 10.0;

/// Hard ceiling for bracket expansion.
pub const BRENT_BRACKET_MAX: f64 = 1e6;

/// Brent iteration cap.
pub const BRENT_MAX_ITERATIONS: usize = 200;

/// Trials per batch in streaming execution.
pub const TRIAL_BATCH_SIZE: usize = 1000;

/// Trial count at which stochastic runs route to the streaming engine.
pub const STREAMING_TRIAL_THRESHOLD: u32 = 10_000;

/// Imputed return for a trial whose fund never distributes (total write-off).
pub const TOTAL_LOSS_RATE: f64 = -1.0;

/// Quantile nodes used by the deterministic expectation engine.
pub const EXPECTATION_QUANTILE_NODES: usize = 128;

/// MOIC uplift applied when recycling is enabled: early distributions are
/// redeployed, lifting the realized multiple by a fixed margin.
pub const RECYCLING_MOIC_UPLIFT: f64 = 1.05;

/// Relative tolerance for the optimal-scenario-count search: the smallest
/// prefix of scenarios whose running mean is within this of the full mean.
pub const OPTIMAL_SCENARIO_TOLERANCE: f64 = 1e-3;

/// Seconds a `processing` claim may go without progress before it is reapable.
pub const STALE_CLAIM_WINDOW_SECS: i64 = 300;

/// TTL for ephemeral-tier entries.
pub const EPHEMERAL_TTL_SECS: u64 = 900;

/// Codec tag written on zstd-compressed matrix payloads.
pub const MATRIX_CODEC_ZSTD: &str = "zstd";

/// Layout tag for the binary MOIC matrix buffer.
pub const MATRIX_LAYOUT_ROW_MAJOR_F64LE: &str = "row-major-f64le";
