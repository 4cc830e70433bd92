//! # vintage-engine
//!
//! The Monte Carlo simulation engine. Composes the XIRR solver, the
//! power-law exit sampler, and the distribution validator into three
//! execution plans: a deterministic expectation engine, an orchestrated
//! per-trial engine for mid-size runs, and a batched streaming engine
//! whose peak memory is independent of trial count.

mod accumulator;
mod expectation;
mod matrix_gen;
mod sampler;
mod selector;
mod stochastic;
mod streaming;
mod trial;

pub mod engine;

pub use accumulator::{MetricAccumulator, QuantileSketch};
pub use engine::{RunMetadata, SimulationEngine, SimulationOutput};
pub use matrix_gen::{generate_matrix, MoicGrid};
pub use sampler::PowerLawExit;
pub use selector::{select_plan, ExecutionPlan};
