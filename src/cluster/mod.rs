//! Clusters: append-only member lists with a member centroid.
//!
//! ```text
//!   members:  [ m0, m1, m2, ..., m(n-1) ]   (insertion order)
//!                     ^                ^
//!                 centroid        scan starts here, walks left
//! ```
//!
//! The centroid is stored as a position into `members`, so it can only ever
//! name one of the cluster's own items.

mod centroid;
mod scan;

pub use centroid::{CentroidStrategy, DEFAULT_ENTROPY_THRESHOLD};
pub use scan::DEFAULT_SCAN_WINDOW;

use crate::distance::Metric;

/// A group of items with one representative member.
#[derive(Debug, Clone)]
pub struct Cluster<T> {
    members: Vec<T>,
    centroid: Option<usize>,
}

impl<T> Default for Cluster<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Cluster<T> {
    /// Create an empty cluster. Its centroid is undefined until the first add.
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            centroid: None,
        }
    }

    /// Create a cluster whose sole member is also its centroid.
    pub fn from_item(item: T) -> Self {
        Self {
            members: vec![item],
            centroid: Some(0),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[T] {
        &self.members
    }

    pub fn centroid(&self) -> Option<&T> {
        self.centroid.map(|i| &self.members[i])
    }

    /// Position of the centroid within [`Cluster::members`].
    pub fn centroid_position(&self) -> Option<usize> {
        self.centroid
    }

    /// Append `item` and update the centroid with `strategy`.
    pub fn add<M>(
        &mut self,
        item: T,
        metric: &M,
        strategy: &CentroidStrategy,
        scan_window: Option<usize>,
    ) where
        M: Metric<T> + ?Sized,
    {
        self.members.push(item);
        let next = match self.centroid {
            None => 0,
            Some(current) => strategy.after_insert(&self.members, current, metric, scan_window),
        };
        self.centroid = Some(next);
    }

    /// Approximate nearest member to `query` via the bounded backward scan.
    ///
    /// Returns `None` for an empty cluster. `scan_window: None` scans every
    /// member and returns the exact nearest.
    pub fn find_closest<M>(&self, query: &T, metric: &M, scan_window: Option<usize>) -> Option<&T>
    where
        M: Metric<T> + ?Sized,
    {
        scan::closest_position(&self.members, query, metric, scan_window).map(|i| &self.members[i])
    }

    /// Whether any member lies within `threshold` of `item`.
    ///
    /// Always a full scan; member order says nothing about distance.
    pub fn contains<M>(&self, item: &T, threshold: f32, metric: &M) -> bool
    where
        M: Metric<T> + ?Sized,
    {
        self.members
            .iter()
            .any(|m| metric.distance(item, m) <= threshold)
    }

    /// Mean distance from the centroid to every member. `None` when empty.
    pub fn entropy<M>(&self, metric: &M) -> Option<f32>
    where
        M: Metric<T> + ?Sized,
    {
        self.centroid
            .map(|c| centroid::entropy(&self.members, c, metric))
    }

    /// The exact medoid, computed on demand (O(n²)). Does not move the centroid.
    pub fn medoid<M>(&self, metric: &M) -> Option<&T>
    where
        M: Metric<T> + ?Sized,
    {
        centroid::medoid_position(&self.members, metric).map(|i| &self.members[i])
    }
}
