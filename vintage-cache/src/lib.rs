//! # vintage-cache
//!
//! Two-tier cache for precomputed scenario matrices. The durable tier is
//! the single source of truth; the moka tier is a pure performance cache.
//! A canonical blake3 key dedupes identical configs across requests, the
//! unique-keyed insert makes exactly one racer the generator, and losers
//! await the row's terminal status instead of duplicating work.

mod codec;
mod coordinator;
mod key;
mod l1;
mod reaper;

pub use codec::{decode_moic_matrix, encode_moic_matrix};
pub use coordinator::ScenarioMatrixCache;
pub use key::matrix_key;
pub use l1::MokaTier;
pub use reaper::StaleClaimReaper;
