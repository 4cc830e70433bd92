//! Mergeable streaming accumulators.
//!
//! Batches fold trial outcomes into these and the per-batch results merge
//! into a final accumulator. Every merge operator (count/sum/sum-of-squares
//! addition, min/max, bucket-count addition) is associative and commutative,
//! so batch-merge order cannot affect the output beyond floating-point
//! rounding.

use std::collections::BTreeMap;

use vintage_core::models::{Percentiles, SummaryStatistics};

/// Relative-accuracy parameter for the quantile sketch buckets.
const SKETCH_ACCURACY: f64 = 0.001;

/// Magnitudes below this collapse into the zero bucket.
const MIN_TRACKED: f64 = 1e-9;

/// Log-bucketed quantile sketch with a mirrored store for negatives.
///
/// A value x > 0 lands in bucket ceil(ln x / ln gamma); the bucket's
/// representative value is 2·gamma^k / (gamma + 1), giving every rank query
/// a bounded relative error of `SKETCH_ACCURACY`. Merging is exact: bucket
/// counts add.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuantileSketch {
    positive: BTreeMap<i32, u64>,
    negative: BTreeMap<i32, u64>,
    zero_count: u64,
    count: u64,
}

impl QuantileSketch {
    pub fn new() -> Self {
        Self::default()
    }

    fn gamma() -> f64 {
        (1.0 + SKETCH_ACCURACY) / (1.0 - SKETCH_ACCURACY)
    }

    fn bucket(magnitude: f64) -> i32 {
        (magnitude.ln() / Self::gamma().ln()).ceil() as i32
    }

    fn representative(key: i32) -> f64 {
        let gamma = Self::gamma();
        2.0 * gamma.powi(key) / (gamma + 1.0)
    }

    pub fn insert(&mut self, value: f64) {
        self.count += 1;
        if value.abs() < MIN_TRACKED {
            self.zero_count += 1;
        } else if value > 0.0 {
            *self.positive.entry(Self::bucket(value)).or_insert(0) += 1;
        } else {
            *self.negative.entry(Self::bucket(-value)).or_insert(0) += 1;
        }
    }

    /// Merge another sketch into this one by adding bucket counts.
    pub fn merge(&mut self, other: &QuantileSketch) {
        self.count += other.count;
        self.zero_count += other.zero_count;
        for (key, n) in &other.positive {
            *self.positive.entry(*key).or_insert(0) += n;
        }
        for (key, n) in &other.negative {
            *self.negative.entry(*key).or_insert(0) += n;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Value at quantile `q ∈ [0, 1]`. Walks negatives (most negative
    /// first), then zeros, then positives.
    pub fn quantile(&self, q: f64) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let target = ((q * (self.count - 1) as f64).round() as u64).min(self.count - 1);
        let mut seen = 0u64;

        // Negative buckets: larger key = larger magnitude = smaller value.
        for (key, n) in self.negative.iter().rev() {
            seen += n;
            if seen > target {
                return -Self::representative(*key);
            }
        }
        seen += self.zero_count;
        if seen > target {
            return 0.0;
        }
        for (key, n) in &self.positive {
            seen += n;
            if seen > target {
                return Self::representative(*key);
            }
        }
        // Unreachable when counts are consistent; fall back to the max bucket.
        self.positive
            .keys()
            .next_back()
            .map(|k| Self::representative(*k))
            .unwrap_or(0.0)
    }

    /// The five reported percentile points.
    pub fn percentiles(&self) -> Percentiles {
        Percentiles {
            p5: self.quantile(0.05),
            p25: self.quantile(0.25),
            p50: self.quantile(0.50),
            p75: self.quantile(0.75),
            p95: self.quantile(0.95),
        }
    }
}

/// Streaming moments plus the quantile sketch for one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricAccumulator {
    count: u64,
    sum: f64,
    sum_sq: f64,
    min: f64,
    max: f64,
    sketch: QuantileSketch,
}

impl Default for MetricAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricAccumulator {
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_sq: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sketch: QuantileSketch::new(),
        }
    }

    pub fn insert(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sketch.insert(value);
    }

    pub fn merge(&mut self, other: &MetricAccumulator) {
        self.count += other.count;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sketch.merge(&other.sketch);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Summary statistics from the running moments. Sample standard
    /// deviation (n - 1) with a guard against negative rounding residue.
    pub fn statistics(&self) -> SummaryStatistics {
        let n = self.count as f64;
        let mean = if self.count == 0 { 0.0 } else { self.sum / n };
        let std_dev = if self.count > 1 {
            ((self.sum_sq - n * mean * mean) / (n - 1.0)).max(0.0).sqrt()
        } else {
            0.0
        };
        SummaryStatistics {
            mean,
            std_dev,
            min: if self.count == 0 { 0.0 } else { self.min },
            max: if self.count == 0 { 0.0 } else { self.max },
        }
    }

    pub fn percentiles(&self) -> Percentiles {
        self.sketch.percentiles()
    }
}

/// Exact percentiles from materialized trial values (orchestrated mode):
/// sorted order statistics with linear interpolation.
pub(crate) fn exact_percentiles(sorted: &[f64]) -> Percentiles {
    Percentiles {
        p5: exact_quantile(sorted, 0.05),
        p25: exact_quantile(sorted, 0.25),
        p50: exact_quantile(sorted, 0.50),
        p75: exact_quantile(sorted, 0.75),
        p95: exact_quantile(sorted, 0.95),
    }
}

fn exact_quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}
