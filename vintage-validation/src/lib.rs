//! # vintage-validation
//!
//! The sole defense against silent generator bugs: every distribution the
//! engine produces passes through here before it is returned or persisted.
//! Checks aggregate — a caller sees every violated invariant, not just the
//! first.

mod validator;

pub use validator::DistributionValidator;
