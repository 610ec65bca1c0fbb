//! Scalar admission prefilter.
//!
//! A [`Prefilter`] projects each item onto a single number and keeps running
//! statistics over every item the index has stored. Admission is a z-score
//! test against those statistics, so it costs one projection and never calls
//! the metric.
//!
//! The gate is a heuristic. A false positive costs one extra metric call later;
//! a false negative sends an item to a fresh cluster and quietly lowers recall,
//! so keep `threshold` generous (1.5 or more).

use crate::error::{ClusterError, Result};
use std::fmt;

/// Standard deviation used before any spread has been observed.
pub const DEFAULT_FALLBACK_STD_DEV: f64 = 1.0;

/// Default admission threshold, in standard deviations.
pub const DEFAULT_THRESHOLD: f64 = 2.0;

/// Single-pass mean/variance accumulator (Welford).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one value into the statistics.
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sum of squared deviations from the mean.
    pub fn m2(&self) -> f64 {
        self.m2
    }

    /// Sample variance, `None` with fewer than two values.
    pub fn variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// Sample standard deviation, `None` with fewer than two values.
    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }
}

type Projection<T> = Box<dyn Fn(&T) -> f64 + Send + Sync>;

/// Global admission gate over a scalar projection of items.
pub struct Prefilter<T> {
    projection: Projection<T>,
    threshold: f64,
    fallback_std_dev: f64,
    stats: RunningStats,
}

impl<T> fmt::Debug for Prefilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prefilter")
            .field("threshold", &self.threshold)
            .field("fallback_std_dev", &self.fallback_std_dev)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<T> Prefilter<T> {
    /// Create a prefilter admitting items within `threshold` standard
    /// deviations of the running mean of `projection`.
    pub fn new<F>(projection: F, threshold: f64) -> Result<Self>
    where
        F: Fn(&T) -> f64 + Send + Sync + 'static,
    {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ClusterError::InvalidParameter(format!(
                "prefilter threshold must be finite and > 0, got {threshold}"
            )));
        }
        Ok(Self {
            projection: Box::new(projection),
            threshold,
            fallback_std_dev: DEFAULT_FALLBACK_STD_DEV,
            stats: RunningStats::new(),
        })
    }

    /// Override the standard deviation used while no spread has been seen.
    pub fn with_fallback_std_dev(mut self, std_dev: f64) -> Result<Self> {
        if !std_dev.is_finite() || std_dev <= 0.0 {
            return Err(ClusterError::InvalidParameter(format!(
                "fallback std dev must be finite and > 0, got {std_dev}"
            )));
        }
        self.fallback_std_dev = std_dev;
        Ok(self)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn stats(&self) -> &RunningStats {
        &self.stats
    }

    pub fn count(&self) -> u64 {
        self.stats.count()
    }

    pub fn mean(&self) -> f64 {
        self.stats.mean()
    }

    /// Standard deviation used by the gate.
    ///
    /// Falls back to the configured default until at least two items with
    /// distinct projections have been observed.
    pub fn std_dev(&self) -> f64 {
        match self.stats.std_dev() {
            Some(sd) if sd > 0.0 => sd,
            _ => self.fallback_std_dev,
        }
    }

    /// Raw projection of an item.
    pub fn project(&self, item: &T) -> f64 {
        (self.projection)(item)
    }

    /// Projection of an item, rejecting NaN and infinities.
    pub fn checked_projection(&self, item: &T) -> Result<f64> {
        let x = self.project(item);
        if x.is_finite() {
            Ok(x)
        } else {
            Err(ClusterError::NonFiniteProjection(x))
        }
    }

    /// Record a stored item. Non-finite projections are rejected without
    /// touching the statistics.
    pub fn observe(&mut self, item: &T) -> Result<()> {
        let x = self.checked_projection(item)?;
        self.observe_projection(x);
        Ok(())
    }

    pub(crate) fn observe_projection(&mut self, x: f64) {
        self.stats.push(x);
    }

    /// Is `item` within `threshold` standard deviations of the running mean?
    ///
    /// Everything is admitted before the first observation.
    pub fn admits(&self, item: &T) -> bool {
        if self.stats.count() == 0 {
            return true;
        }
        self.within_band(self.project(item), self.stats.mean())
    }

    /// Is `item` within `threshold` standard deviations of `representative`?
    ///
    /// Uses the global spread, not a per-cluster one.
    pub fn admits_near(&self, item: &T, representative: &T) -> bool {
        self.within_band(self.project(item), self.project(representative))
    }

    fn within_band(&self, x: f64, center: f64) -> bool {
        // NaN compares false, so a bad projection is never admitted.
        (x - center).abs() <= self.threshold * self.std_dev()
    }
}
