//! Size-hinted convenience wrapper.
//!
//! [`SemanticClusters`] is the "just give me an index" entry point: capacity
//! comes from the expected dataset size, routing is best-fit, centroids are
//! exact medoids gated by entropy, and a query scans the single nearest
//! cluster exhaustively.

use crate::distance::Metric;
use crate::error::Result;
use crate::index::{ClusterIndex, ClusterIndexParams};

/// Best-fit clustered index configured from a dataset size hint.
#[derive(Debug)]
pub struct SemanticClusters<T, M> {
    index: ClusterIndex<T, M>,
}

impl<T, M> SemanticClusters<T, M>
where
    M: Metric<T>,
{
    /// `expected_size` sets capacity to `max(1, round(sqrt(expected_size)))`.
    pub fn new(metric: M, expected_size: usize, entropy_threshold: f32) -> Result<Self> {
        let params = ClusterIndexParams::for_dataset_size(expected_size)
            .with_entropy_threshold(entropy_threshold)
            .with_candidate_count(1)
            .with_scan_window(None);
        Ok(Self {
            index: ClusterIndex::new(metric, params)?,
        })
    }

    pub fn add(&mut self, item: T) -> Result<()> {
        self.index.insert(item)
    }

    pub fn query(&self, item: &T) -> Result<&T> {
        self.index.query(item)
    }

    pub fn index(&self) -> &ClusterIndex<T, M> {
        &self.index
    }

    pub fn into_inner(self) -> ClusterIndex<T, M> {
        self.index
    }
}
