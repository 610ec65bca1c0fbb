//! Property-based tests for the clustered index.
//!
//! These tests verify invariants that should hold regardless of input:
//! - Every inserted item is stored exactly once
//! - Centroids are always members of their own cluster
//! - The bounded scan never does worse than the newest member
//! - Running prefilter statistics match a batch computation

use proptest::prelude::*;
use semclust::{
    AbsoluteDifference, CentroidStrategy, Cluster, ClusterIndex, ClusterIndexParams, Prefilter,
    RunningStats,
};

fn arb_strategy() -> impl Strategy<Value = CentroidStrategy> {
    prop_oneof![
        (0.0f32..5.0).prop_map(|t| CentroidStrategy::ExactMedoid {
            entropy_threshold: t
        }),
        Just(CentroidStrategy::NearestToLatest),
    ]
}

fn arb_params() -> impl Strategy<Value = ClusterIndexParams> {
    (
        1usize..12,
        1usize..5,
        prop::option::of(1usize..8),
        arb_strategy(),
    )
        .prop_map(|(capacity, k, window, centroid)| {
            ClusterIndexParams::default()
                .with_capacity(capacity)
                .with_candidate_count(k)
                .with_scan_window(window)
                .with_centroid_strategy(centroid)
        })
}

fn build(
    items: &[f32],
    params: ClusterIndexParams,
    prefilter_threshold: Option<f64>,
) -> ClusterIndex<f32, AbsoluteDifference> {
    let mut index = match prefilter_threshold {
        Some(t) => {
            let p = Prefilter::new(|x: &f32| f64::from(*x), t).unwrap();
            ClusterIndex::with_prefilter(AbsoluteDifference, p, params).unwrap()
        }
        None => ClusterIndex::new(AbsoluteDifference, params).unwrap(),
    };
    for &x in items {
        index.insert(x).unwrap();
    }
    index
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn inserts_are_conserved(
        items in prop::collection::vec(-1000.0f32..1000.0, 0..120),
        params in arb_params(),
        threshold in prop::option::of(1.5f64..4.0),
    ) {
        let index = build(&items, params, threshold);
        prop_assert_eq!(index.len(), items.len());

        let mut stored: Vec<f32> = index
            .clusters()
            .iter()
            .flat_map(|c| c.members().iter().copied())
            .collect();
        let mut expected = items.clone();
        stored.sort_by(f32::total_cmp);
        expected.sort_by(f32::total_cmp);
        prop_assert_eq!(stored, expected);

        if let Some(p) = index.prefilter() {
            prop_assert_eq!(p.count(), items.len() as u64);
        }
    }

    #[test]
    fn centroids_are_members(
        items in prop::collection::vec(-100.0f32..100.0, 1..120),
        params in arb_params(),
        threshold in prop::option::of(1.5f64..4.0),
    ) {
        let index = build(&items, params, threshold);
        for c in index.clusters() {
            let pos = c.centroid_position().expect("clusters are never empty");
            prop_assert!(pos < c.len());
            prop_assert_eq!(c.centroid(), Some(&c.members()[pos]));
        }
    }

    #[test]
    fn best_fit_never_exceeds_capacity(
        items in prop::collection::vec(-100.0f32..100.0, 1..120),
        params in arb_params(),
    ) {
        let capacity = params.capacity;
        let index = build(&items, params, None);
        for c in index.clusters() {
            prop_assert!(c.len() <= capacity);
        }
    }

    #[test]
    fn query_returns_a_stored_item(
        items in prop::collection::vec(-100.0f32..100.0, 1..80),
        params in arb_params(),
        threshold in prop::option::of(1.5f64..4.0),
        target in -150.0f32..150.0,
    ) {
        let index = build(&items, params, threshold);
        let n = index.query_with_distance(&target).unwrap();
        prop_assert!(items.contains(n.item));
        prop_assert_eq!(n.distance, (target - *n.item).abs());
        prop_assert!(index.clusters()[n.cluster].members().contains(n.item));
    }

    #[test]
    fn exhaustive_search_with_all_candidates_is_exact(
        items in prop::collection::vec(-100.0f32..100.0, 1..80),
        capacity in 1usize..10,
        target in -150.0f32..150.0,
    ) {
        let params = ClusterIndexParams::default()
            .with_capacity(capacity)
            .with_candidate_count(usize::MAX)
            .with_scan_window(None);
        let index = build(&items, params, None);
        let got = index.query_with_distance(&target).unwrap();
        let truth = items
            .iter()
            .map(|x| (target - x).abs())
            .fold(f32::INFINITY, f32::min);
        prop_assert_eq!(got.distance, truth);
    }

    #[test]
    fn bounded_scan_beats_newest_member(
        members in prop::collection::vec(-100.0f32..100.0, 1..60),
        query in -150.0f32..150.0,
        window in 1usize..8,
    ) {
        let mut cluster = Cluster::new();
        for &m in &members {
            cluster.add(m, &AbsoluteDifference, &CentroidStrategy::NearestToLatest, Some(window));
        }
        let newest = *members.last().unwrap();
        let found = *cluster.find_closest(&query, &AbsoluteDifference, Some(window)).unwrap();
        prop_assert!((query - found).abs() <= (query - newest).abs());

        let exact = *cluster.find_closest(&query, &AbsoluteDifference, None).unwrap();
        let truth = members.iter().map(|m| (query - m).abs()).fold(f32::INFINITY, f32::min);
        prop_assert_eq!((query - exact).abs(), truth);
    }

    #[test]
    fn contains_agrees_with_linear_scan(
        members in prop::collection::vec(-100.0f32..100.0, 0..60),
        needle in -150.0f32..150.0,
        threshold in 0.0f32..20.0,
    ) {
        let mut cluster = Cluster::new();
        for &m in &members {
            cluster.add(m, &AbsoluteDifference, &CentroidStrategy::default(), Some(1));
        }
        let expected = members.iter().any(|m| (needle - m).abs() <= threshold);
        prop_assert_eq!(cluster.contains(&needle, threshold, &AbsoluteDifference), expected);
    }

    #[test]
    fn running_stats_match_batch(
        xs in prop::collection::vec(-1e4f64..1e4, 2..200),
    ) {
        let mut s = RunningStats::new();
        for &x in &xs {
            s.push(x);
        }
        let n = xs.len() as f64;
        let mean = xs.iter().sum::<f64>() / n;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);

        prop_assert!((s.mean() - mean).abs() <= 1e-9 * mean.abs().max(1.0));
        prop_assert!((s.std_dev().unwrap() - var.sqrt()).abs() <= 1e-6 * var.sqrt().max(1.0));
    }
}
