//! Centroid maintenance strategies.
//!
//! A centroid is always an existing member, never a synthesized point, so the
//! index works for item types that have no notion of averaging.

use super::scan::closest_position;
use crate::distance::Metric;

/// Default entropy threshold for [`CentroidStrategy::ExactMedoid`].
pub const DEFAULT_ENTROPY_THRESHOLD: f32 = 0.5;

/// How a cluster re-derives its centroid after an insert.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CentroidStrategy {
    /// Full O(n²) medoid recompute, run only when the cluster's entropy
    /// (mean distance from centroid to members) exceeds `entropy_threshold`.
    ExactMedoid { entropy_threshold: f32 },
    /// Centroid becomes the older member nearest to the item just inserted,
    /// found with the bounded scan. O(n) at worst, drifts from the medoid.
    NearestToLatest,
}

impl Default for CentroidStrategy {
    fn default() -> Self {
        Self::ExactMedoid {
            entropy_threshold: DEFAULT_ENTROPY_THRESHOLD,
        }
    }
}

impl CentroidStrategy {
    /// New centroid position after `members.last()` was appended.
    ///
    /// `current` is the centroid before the insert. The caller guarantees
    /// `members` is non-empty and `current < members.len()`.
    pub(crate) fn after_insert<T, M>(
        &self,
        members: &[T],
        current: usize,
        metric: &M,
        scan_window: Option<usize>,
    ) -> usize
    where
        M: Metric<T> + ?Sized,
    {
        let Some((latest, older)) = members.split_last() else {
            return current;
        };
        match *self {
            Self::ExactMedoid { entropy_threshold } => {
                let e = entropy(members, current, metric);
                if e > entropy_threshold {
                    let next = medoid_position(members, metric).unwrap_or(current);
                    tracing::debug!(
                        members = members.len(),
                        entropy = e,
                        from = current,
                        to = next,
                        "recomputed medoid"
                    );
                    next
                } else {
                    current
                }
            }
            Self::NearestToLatest => {
                closest_position(older, latest, metric, scan_window).unwrap_or(current)
            }
        }
    }
}

/// Mean distance from `members[centroid]` to every member (itself included).
pub(crate) fn entropy<T, M>(members: &[T], centroid: usize, metric: &M) -> f32
where
    M: Metric<T> + ?Sized,
{
    if members.is_empty() {
        return 0.0;
    }
    let c = &members[centroid];
    let total: f32 = members.iter().map(|m| metric.distance(c, m)).sum();
    total / members.len() as f32
}

/// Member minimizing the summed distance to all others. Ties go to the
/// earliest member.
pub(crate) fn medoid_position<T, M>(members: &[T], metric: &M) -> Option<usize>
where
    M: Metric<T> + ?Sized,
{
    let mut best: Option<(usize, f32)> = None;
    for (i, candidate) in members.iter().enumerate() {
        let total: f32 = members.iter().map(|o| metric.distance(candidate, o)).sum();
        if best.map_or(true, |(_, t)| total < t) {
            best = Some((i, total));
        }
    }
    best.map(|(i, _)| i)
}
