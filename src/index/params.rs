//! Index configuration.

use crate::cluster::{CentroidStrategy, DEFAULT_SCAN_WINDOW};
use crate::error::{ClusterError, Result};

/// Default number of clusters examined per query.
pub const DEFAULT_CANDIDATE_COUNT: usize = 3;

/// Default cluster capacity when no dataset size hint is given.
pub const DEFAULT_CAPACITY: usize = 32;

/// Parameters for [`ClusterIndex`](super::ClusterIndex).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterIndexParams {
    /// Target maximum members per cluster.
    pub capacity: usize,

    /// Number of top-ranked clusters searched per query.
    pub candidate_count: usize,

    /// Worsening-streak bound for the intra-cluster scan (`None` = full scan).
    pub scan_window: Option<usize>,

    /// Centroid maintenance strategy.
    pub centroid: CentroidStrategy,
}

impl Default for ClusterIndexParams {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            candidate_count: DEFAULT_CANDIDATE_COUNT,
            scan_window: Some(DEFAULT_SCAN_WINDOW),
            centroid: CentroidStrategy::default(),
        }
    }
}

impl ClusterIndexParams {
    /// Defaults with `capacity = max(1, round(sqrt(expected_size)))`.
    pub fn for_dataset_size(expected_size: usize) -> Self {
        Self {
            capacity: capacity_for(expected_size),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_candidate_count(mut self, candidate_count: usize) -> Self {
        self.candidate_count = candidate_count;
        self
    }

    /// Set the scan bound; `None` disables early exit.
    #[must_use]
    pub fn with_scan_window(mut self, scan_window: Option<usize>) -> Self {
        self.scan_window = scan_window;
        self
    }

    #[must_use]
    pub fn with_centroid_strategy(mut self, centroid: CentroidStrategy) -> Self {
        self.centroid = centroid;
        self
    }

    /// Use the exact-medoid strategy with the given entropy threshold.
    #[must_use]
    pub fn with_entropy_threshold(mut self, entropy_threshold: f32) -> Self {
        self.centroid = CentroidStrategy::ExactMedoid { entropy_threshold };
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(ClusterError::InvalidParameter(
                "capacity must be greater than 0".to_string(),
            ));
        }
        if self.candidate_count == 0 {
            return Err(ClusterError::InvalidParameter(
                "candidate_count must be greater than 0".to_string(),
            ));
        }
        if self.scan_window == Some(0) {
            return Err(ClusterError::InvalidParameter(
                "scan_window must be greater than 0 (use None for a full scan)".to_string(),
            ));
        }
        if let CentroidStrategy::ExactMedoid { entropy_threshold } = self.centroid {
            if !entropy_threshold.is_finite() || entropy_threshold < 0.0 {
                return Err(ClusterError::InvalidParameter(format!(
                    "entropy_threshold must be finite and >= 0, got {entropy_threshold}"
                )));
            }
        }
        Ok(())
    }
}

fn capacity_for(expected_size: usize) -> usize {
    ((expected_size as f64).sqrt().round() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_follows_sqrt() {
        assert_eq!(ClusterIndexParams::for_dataset_size(0).capacity, 1);
        assert_eq!(ClusterIndexParams::for_dataset_size(1).capacity, 1);
        assert_eq!(ClusterIndexParams::for_dataset_size(10).capacity, 3);
        assert_eq!(ClusterIndexParams::for_dataset_size(12).capacity, 3);
        assert_eq!(ClusterIndexParams::for_dataset_size(13).capacity, 4);
        assert_eq!(ClusterIndexParams::for_dataset_size(10_000).capacity, 100);
    }

    #[test]
    fn defaults_are_valid() {
        ClusterIndexParams::default().validate().unwrap();
    }

    #[test]
    fn rejects_degenerate_values() {
        let base = ClusterIndexParams::default();
        assert!(base.clone().with_capacity(0).validate().is_err());
        assert!(base.clone().with_candidate_count(0).validate().is_err());
        assert!(base.clone().with_scan_window(Some(0)).validate().is_err());
        assert!(base.clone().with_entropy_threshold(-1.0).validate().is_err());
        assert!(base.clone().with_entropy_threshold(f32::NAN).validate().is_err());
        assert!(base.with_scan_window(None).validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn params_serde() {
        let params = ClusterIndexParams::for_dataset_size(400)
            .with_centroid_strategy(CentroidStrategy::NearestToLatest)
            .with_scan_window(None);
        let json = serde_json::to_string(&params).unwrap();
        let parsed: ClusterIndexParams = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, params);
    }
}
