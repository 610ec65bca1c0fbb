//! semclust: online clustered approximate nearest-neighbor search.
//!
//! Items of any type are grouped into clusters as they arrive. Every cluster
//! keeps one of its own members as a centroid, and both inserts and queries
//! only ever compare against a handful of candidate clusters:
//!
//! - `distance`: the [`Metric`] capability the index is generic over
//! - `prefilter`: a scalar running-statistics gate that routes without metric calls
//! - `cluster`: member storage, centroid strategies, bounded recency-first scan
//! - `index`: insert routing and candidate-cluster query orchestration
//!
//! # Quick Start
//!
//! ```
//! use semclust::{AbsoluteDifference, ClusterIndex, ClusterIndexParams};
//!
//! let params = ClusterIndexParams::default().with_capacity(2);
//! let mut index = ClusterIndex::new(AbsoluteDifference, params)?;
//! for x in [0.0f32, 1.0, 2.0, 100.0] {
//!     index.insert(x)?;
//! }
//! assert_eq!(index.query(&1.5)?, &1.0);
//! assert_eq!(index.query(&99.0)?, &100.0);
//! # Ok::<(), semclust::ClusterError>(())
//! ```
//!
//! # Critical Nuances
//!
//! ## Results are approximate
//!
//! Only the `candidate_count` clusters with the nearest centroids are
//! searched, and within a cluster the scan stops after `scan_window`
//! consecutive non-improving members. Set `scan_window` to `None` for an exact
//! intra-cluster answer; the cluster ranking stays heuristic regardless.
//!
//! ## No metric axioms
//!
//! Pruning never relies on the triangle inequality, so any symmetric,
//! non-negative dissimilarity works.
//!
//! ## Single writer
//!
//! An index is plain owned state with no interior locking. Share it behind a
//! single `Mutex`/`RwLock` if several threads need it.

pub mod cluster;
pub mod distance;
pub mod error;
pub mod index;
pub mod prefilter;
pub mod semantic;

// Re-exports
pub use cluster::{CentroidStrategy, Cluster};
pub use distance::{AbsoluteDifference, DistanceMetric, Metric};
pub use error::{ClusterError, Result};
pub use index::{ClusterIndex, ClusterIndexParams, IndexStats, Neighbor};
pub use prefilter::{Prefilter, RunningStats};
pub use semantic::SemanticClusters;
