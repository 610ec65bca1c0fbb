//! Distance metrics.
//!
//! The index never assumes a coordinate space: it only ever asks a [`Metric`]
//! how far apart two items are. Closures work out of the box, and the dense
//! metrics below cover the common `[f32]` embedding case.
//!
//! ## Important nuance
//!
//! Nothing in this crate relies on the triangle inequality. Cluster pruning is
//! heuristic, so a metric that violates it (e.g. [`cosine_distance`]) degrades
//! recall gracefully instead of breaking the index.

/// A dissimilarity function over items of type `T`.
///
/// Implementations must be deterministic and side-effect free, return finite
/// non-negative values, and be symmetric. Lower means more similar.
pub trait Metric<T: ?Sized> {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &T, b: &T) -> f32;
}

impl<T: ?Sized, F> Metric<T> for F
where
    F: Fn(&T, &T) -> f32,
{
    #[inline]
    fn distance(&self, a: &T, b: &T) -> f32 {
        self(a, b)
    }
}

/// `|a - b|` over scalars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbsoluteDifference;

impl Metric<f32> for AbsoluteDifference {
    #[inline]
    fn distance(&self, a: &f32, b: &f32) -> f32 {
        (a - b).abs()
    }
}

impl Metric<f64> for AbsoluteDifference {
    #[inline]
    fn distance(&self, a: &f64, b: &f64) -> f32 {
        (a - b).abs() as f32
    }
}

/// Built-in metrics for `[f32]` embeddings.
///
/// Vectors of different lengths are infinitely far apart, so a stray item of
/// the wrong width can sit in the index without ever being returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceMetric {
    /// Straight-line distance.
    L2,
    /// One minus cosine similarity; ranges over `[0, 2]`.
    Cosine,
    /// Angle between the vectors scaled to `[0, 1]`.
    Angular,
}

impl DistanceMetric {
    #[inline]
    #[must_use]
    pub fn compute(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::L2 => l2_distance(a, b),
            DistanceMetric::Cosine => cosine_distance(a, b),
            DistanceMetric::Angular => angular_distance(a, b),
        }
    }
}

impl Metric<[f32]> for DistanceMetric {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        self.compute(a, b)
    }
}

impl Metric<Vec<f32>> for DistanceMetric {
    #[inline]
    fn distance(&self, a: &Vec<f32>, b: &Vec<f32>) -> f32 {
        self.compute(a, b)
    }
}

/// Run `kernel` on equal-width inputs; unequal widths never match.
#[inline]
fn same_width(a: &[f32], b: &[f32], kernel: impl FnOnce(&[f32], &[f32]) -> f32) -> f32 {
    if a.len() == b.len() {
        kernel(a, b)
    } else {
        f32::INFINITY
    }
}

#[inline]
#[must_use]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    same_width(a, b, |a, b| {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt()
    })
}

/// Zero vectors count as orthogonal to everything.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut na, mut nb) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0)
}

/// Norms are computed here; callers need not normalize.
#[inline]
#[must_use]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    same_width(a, b, |a, b| 1.0 - cosine_similarity(a, b))
}

#[inline]
#[must_use]
pub fn angular_distance(a: &[f32], b: &[f32]) -> f32 {
    same_width(a, b, |a, b| {
        cosine_similarity(a, b).acos() / std::f32::consts::PI
    })
}
