//! # vintage-xirr
//!
//! Annualized internal rate of return for cash flows on irregular dates.
//! Newton-Raphson from a fixed initial guess, with a Brent's-method
//! fallback for the shapes Newton diverges on (extreme short-horizon
//! multiples in particular).

mod brent;
mod newton;
mod npv;
mod solver;

pub use npv::{npv, npv_derivative};
pub use solver::solve_xirr;
