//! Power-law (Pareto) exit-multiple sampler calibrated to a median and a
//! 90th percentile.
//!
//! Survival function P(X ≥ x) = (x_min / x)^alpha, so requiring
//! P(X ≥ median) = 0.5 and P(X ≥ p90) = 0.1 gives
//! alpha = ln 5 / ln(p90 / median) and x_min = median / 2^(1/alpha).

use rand::Rng;

use vintage_core::errors::SamplerError;

/// Calibrated heavy-tailed exit-multiple distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawExit {
    alpha: f64,
    x_min: f64,
}

impl PowerLawExit {
    /// Calibrate so the distribution's median and 90th percentile hit the
    /// given targets. `p90` must strictly exceed a positive `median`.
    pub fn calibrate(median: f64, p90: f64) -> Result<Self, SamplerError> {
        if !(median > 0.0) || !(p90 > median) || !median.is_finite() || !p90.is_finite() {
            return Err(SamplerError::InvalidCalibration { median, p90 });
        }
        let alpha = 5.0_f64.ln() / (p90 / median).ln();
        let x_min = median / 2.0_f64.powf(1.0 / alpha);
        Ok(Self { alpha, x_min })
    }

    /// Draw one exit multiple via the inverse CDF.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        // gen::<f64>() is uniform on [0, 1), so 1 - u never reaches zero.
        let u: f64 = rng.gen();
        self.quantile(u)
    }

    /// Deterministic inverse CDF at `u ∈ [0, 1)`. Used directly by the
    /// expectation engine's quantile nodes.
    pub fn quantile(&self, u: f64) -> f64 {
        self.x_min / (1.0 - u).powf(1.0 / self.alpha)
    }

    /// Closed-form median (calibration check).
    pub fn median(&self) -> f64 {
        self.quantile(0.5)
    }

    /// Closed-form 90th percentile (calibration check).
    pub fn p90(&self) -> f64 {
        self.quantile(0.9)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }
}
