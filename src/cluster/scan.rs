//! Locality-biased bounded scan.
//!
//! Members inserted close together in time are assumed to sit close together
//! in the metric space. The scan therefore starts at the newest member and
//! walks backward, giving up once `window` consecutive members have failed to
//! beat the best distance seen. Worst case cost is `O(best_position + window)`
//! metric calls instead of `O(n)`.

use crate::distance::Metric;

/// Default worsening-streak bound.
pub const DEFAULT_SCAN_WINDOW: usize = 5;

/// Position of the member closest to `query`, or `None` for an empty slice.
///
/// A single member is returned without calling the metric. `window: None`
/// disables early exit and yields the exact nearest member.
pub(crate) fn closest_position<T, M>(
    members: &[T],
    query: &T,
    metric: &M,
    window: Option<usize>,
) -> Option<usize>
where
    M: Metric<T> + ?Sized,
{
    let last = members.len().checked_sub(1)?;
    if last == 0 {
        return Some(0);
    }

    let mut best = last;
    let mut best_dist = metric.distance(query, &members[last]);
    let mut streak = 0usize;

    for i in (0..last).rev() {
        let d = metric.distance(query, &members[i]);
        if d < best_dist {
            best = i;
            best_dist = d;
            streak = 0;
        } else {
            streak += 1;
            if window.is_some_and(|w| streak >= w) {
                break;
            }
        }
    }

    Some(best)
}
