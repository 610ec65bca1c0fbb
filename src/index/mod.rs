//! Online clustered index.
//!
//! # Insert
//!
//! ```text
//! item ─┬─ no clusters ───────────────────────────────► new cluster
//!       ├─ prefilter:  outlier? ──────────────────────► new cluster
//!       │              first cluster with room whose
//!       │              centroid passes admits_near ──► add (or new cluster)
//!       └─ no prefilter: nearest centroid, full? ─────► new cluster / add
//! ```
//!
//! Prefiltered routing never calls the metric; best-fit routing calls it
//! once per cluster. Either way the centroid strategy may call it afterwards.
//!
//! # Query
//!
//! Clusters are ranked by `distance(target, centroid)` (with a prefilter,
//! only clusters whose centroid passes `admits_near(target, _)` are ranked),
//! the top `candidate_count` are scanned with the bounded backward scan, and
//! the best of their answers wins. Both steps are approximations; raising
//! `candidate_count` or disabling the scan window trades speed for recall.

mod params;

pub use params::{ClusterIndexParams, DEFAULT_CANDIDATE_COUNT, DEFAULT_CAPACITY};

use crate::cluster::Cluster;
use crate::distance::Metric;
use crate::error::{ClusterError, Result};
use crate::prefilter::Prefilter;

/// A query answer.
#[derive(Debug, PartialEq)]
pub struct Neighbor<'a, T> {
    pub item: &'a T,
    /// Metric distance from the query target.
    pub distance: f32,
    /// Creation-order id of the cluster holding `item`.
    pub cluster: usize,
}

/// Statistics about a [`ClusterIndex`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStats {
    pub num_items: usize,
    pub num_clusters: usize,
    pub min_cluster_size: usize,
    pub max_cluster_size: usize,
    pub mean_cluster_size: f32,
    /// Mean over clusters of the centroid-to-member mean distance.
    pub mean_entropy: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NewClusterReason {
    First,
    Outlier,
    NotAdmitted,
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Existing(usize),
    New(NewClusterReason),
}

/// Approximate nearest-neighbor index over a growing set of clusters.
#[derive(Debug)]
pub struct ClusterIndex<T, M> {
    clusters: Vec<Cluster<T>>,
    metric: M,
    prefilter: Option<Prefilter<T>>,
    params: ClusterIndexParams,
    num_items: usize,
}

impl<T, M> ClusterIndex<T, M>
where
    M: Metric<T>,
{
    /// Create an index with best-fit routing (no prefilter).
    pub fn new(metric: M, params: ClusterIndexParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            clusters: Vec::new(),
            metric,
            prefilter: None,
            params,
            num_items: 0,
        })
    }

    /// Create an index with prefiltered first-fit routing.
    pub fn with_prefilter(
        metric: M,
        prefilter: Prefilter<T>,
        params: ClusterIndexParams,
    ) -> Result<Self> {
        let mut index = Self::new(metric, params)?;
        index.prefilter = Some(prefilter);
        Ok(index)
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.num_items
    }

    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Clusters in creation order.
    pub fn clusters(&self) -> &[Cluster<T>] {
        &self.clusters
    }

    pub fn prefilter(&self) -> Option<&Prefilter<T>> {
        self.prefilter.as_ref()
    }

    pub fn params(&self) -> &ClusterIndexParams {
        &self.params
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Insert an item.
    ///
    /// Fails only when a configured prefilter projects the item to NaN or
    /// infinity, in which case nothing is modified.
    pub fn insert(&mut self, item: T) -> Result<()> {
        let projection = match &self.prefilter {
            Some(p) => Some(p.checked_projection(&item)?),
            None => None,
        };

        let route = if self.clusters.is_empty() {
            Route::New(NewClusterReason::First)
        } else {
            match &self.prefilter {
                Some(p) => self.first_fit(p, &item),
                None => self.best_fit(&item),
            }
        };

        match route {
            Route::Existing(id) => {
                tracing::trace!(cluster = id, "routing item to existing cluster");
                self.clusters[id].add(
                    item,
                    &self.metric,
                    &self.params.centroid,
                    self.params.scan_window,
                );
            }
            Route::New(reason) => {
                tracing::debug!(
                    cluster = self.clusters.len(),
                    reason = ?reason,
                    "opening cluster"
                );
                self.clusters.push(Cluster::from_item(item));
            }
        }

        if let (Some(p), Some(x)) = (self.prefilter.as_mut(), projection) {
            p.observe_projection(x);
        }
        self.num_items += 1;
        Ok(())
    }

    /// First cluster (creation order) with room whose centroid the prefilter
    /// admits the item near. No metric calls.
    fn first_fit(&self, prefilter: &Prefilter<T>, item: &T) -> Route {
        if !prefilter.admits(item) {
            return Route::New(NewClusterReason::Outlier);
        }
        self.clusters
            .iter()
            .position(|c| {
                c.len() < self.params.capacity
                    && c.centroid()
                        .is_some_and(|centroid| prefilter.admits_near(item, centroid))
            })
            .map_or(Route::New(NewClusterReason::NotAdmitted), Route::Existing)
    }

    /// Cluster with the nearest centroid, unless it is already full.
    fn best_fit(&self, item: &T) -> Route {
        let nearest = self
            .clusters
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.centroid().map(|ctr| (i, self.metric.distance(item, ctr))))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match nearest {
            Some((id, _)) if self.clusters[id].len() < self.params.capacity => {
                Route::Existing(id)
            }
            Some(_) => Route::New(NewClusterReason::Overflow),
            None => Route::New(NewClusterReason::First),
        }
    }

    /// Ids of the clusters to search for `target`, best ranked first.
    fn candidate_clusters(&self, target: &T) -> Vec<usize> {
        let rank = |admit: &dyn Fn(&T) -> bool| -> Vec<(usize, f32)> {
            self.clusters
                .iter()
                .enumerate()
                .filter_map(|(i, c)| c.centroid().map(|ctr| (i, ctr)))
                .filter(|&(_, ctr)| admit(ctr))
                .map(|(i, ctr)| (i, self.metric.distance(target, ctr)))
                .collect()
        };

        let mut ranked = match &self.prefilter {
            Some(p) => {
                let admitted = rank(&|ctr: &T| p.admits_near(target, ctr));
                if admitted.is_empty() {
                    rank(&|_: &T| true)
                } else {
                    admitted
                }
            }
            None => rank(&|_: &T| true),
        };

        let by_rank =
            |a: &(usize, f32), b: &(usize, f32)| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0));
        let k = self.params.candidate_count;
        if ranked.len() > k {
            ranked.select_nth_unstable_by(k - 1, by_rank);
            ranked.truncate(k);
        }
        ranked.sort_by(by_rank);

        let ids: Vec<usize> = ranked.into_iter().map(|(i, _)| i).collect();
        tracing::trace!(candidates = ?ids, "ranked candidate clusters");
        ids
    }

    /// Approximate nearest stored item to `target`, with its distance.
    pub fn query_with_distance(&self, target: &T) -> Result<Neighbor<'_, T>> {
        if self.is_empty() {
            return Err(ClusterError::EmptyIndex);
        }

        let mut best: Option<Neighbor<'_, T>> = None;
        for id in self.candidate_clusters(target) {
            let Some(item) =
                self.clusters[id].find_closest(target, &self.metric, self.params.scan_window)
            else {
                continue;
            };
            let distance = self.metric.distance(target, item);
            let better = best.as_ref().map_or(true, |b| {
                distance
                    .total_cmp(&b.distance)
                    .then(id.cmp(&b.cluster))
                    .is_lt()
            });
            if better {
                best = Some(Neighbor {
                    item,
                    distance,
                    cluster: id,
                });
            }
        }

        best.ok_or(ClusterError::EmptyIndex)
    }

    /// Approximate nearest stored item to `target`.
    pub fn query(&self, target: &T) -> Result<&T> {
        self.query_with_distance(target).map(|n| n.item)
    }

    /// Whether any stored item lies within `threshold` of `item`.
    ///
    /// Exhaustive over every cluster.
    pub fn contains(&self, item: &T, threshold: f32) -> bool {
        self.clusters
            .iter()
            .any(|c| c.contains(item, threshold, &self.metric))
    }

    /// Cluster size and entropy summary. Costs one metric call per item.
    pub fn stats(&self) -> IndexStats {
        let sizes = self.clusters.iter().map(Cluster::len);
        let num_clusters = self.clusters.len();
        let (mean_cluster_size, mean_entropy) = if num_clusters == 0 {
            (0.0, 0.0)
        } else {
            let entropy: f32 = self
                .clusters
                .iter()
                .filter_map(|c| c.entropy(&self.metric))
                .sum();
            (
                self.num_items as f32 / num_clusters as f32,
                entropy / num_clusters as f32,
            )
        };
        IndexStats {
            num_items: self.num_items,
            num_clusters,
            min_cluster_size: sizes.clone().min().unwrap_or(0),
            max_cluster_size: sizes.max().unwrap_or(0),
            mean_cluster_size,
            mean_entropy,
        }
    }
}
