//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points by neighborhood density. It discovers clusters of
//! arbitrary shape, needs no cluster count up front, and leaves sparse points
//! out of every cluster as noise.
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: Maximum distance between two points to be neighbors.
//!   The boundary is inclusive.
//! - **MinPts**: Minimum size of a dense region, counting the point itself.
//! - **Core point**: Has at least MinPts - 1 neighbors within ε. At the top
//!   level all points are counted; during expansion only the frontier
//!   snapshot is.
//! - **Noise point**: Never claimed by any cluster.
//!
//! ## Algorithm Steps
//!
//! 1. For each point P not already in an output cluster, in input order:
//!    - Find neighbors within ε among all points
//!    - If |neighbors| + 1 < MinPts, label P as noise (may change later)
//!    - Else P is core: seed a cluster with P and expand it
//!
//! 2. Expansion walks a snapshot of P's neighbors (the frontier). A frontier
//!    point that is core *within the frontier* is claimed and pulls its
//!    frontier neighbors into the cluster; it only joins itself if another
//!    frontier core lists it. A frontier point labeled noise is promoted.
//!
//! Expansion only searches the frontier snapshot, never the whole input, and
//! points it merges do not grow the frontier. A point reachable only through
//! a second hop outside the snapshot is left for a later seed. This
//! bounded-recall expansion differs from textbook DBSCAN and is kept on
//! purpose: it decides which points end up in which cluster.
//!
//! Claims are permanent. A point claimed by one expansion is never merged
//! into another, so output clusters are disjoint. A claimed point that no
//! cluster took in can still seed its own cluster at the top level.
//! Expansions that end up smaller than MinPts are dropped, and their members
//! stay claimed.
//!
//! ## Complexity
//!
//! - **Time**: O(n²) neighbor scans at the top level, plus O(k²) per
//!   expansion over a frontier of k points. There is no spatial index.
//! - **Space**: O(n) for the visitation map, O(k) per cluster.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::point::Point;
use super::traits::Clustering;
use crate::error::{Error, Result};

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct Dbscan {
    /// Epsilon: maximum distance for neighborhood.
    epsilon: f64,
    /// Minimum points for core point classification.
    min_pts: usize,
}

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum distance between two points to be neighbors.
    /// * `min_pts` - Minimum number of points to form a dense region.
    pub fn new(epsilon: f64, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Neighborhood radius.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Minimum dense region size.
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// Check the parameters without clustering anything.
    pub fn validate(&self) -> Result<()> {
        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            });
        }

        if self.epsilon.is_nan() || self.epsilon < 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be non-negative",
            });
        }

        Ok(())
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

impl<P: Point> Clustering<P> for Dbscan {
    fn cluster<'a>(&self, points: &'a [P]) -> Result<Vec<Vec<&'a P>>> {
        self.validate()?;
        ensure_unique(points)?;

        let mut visited = VisitationMap::with_capacity(points.len());
        let mut assigned: HashSet<Cow<'a, str>> = HashSet::with_capacity(points.len());
        let mut clusters = Vec::new();

        for point in points {
            let id = point.identity();
            if assigned.contains(id.as_ref()) {
                continue;
            }

            let neighbours = find_neighbours(point, points, self.epsilon);

            // MinPts includes the point itself
            if neighbours.len() + 1 < self.min_pts {
                trace!(point = %id, neighbours = neighbours.len(), "labeled noise");
                visited.mark_noise(id);
                continue;
            }

            visited.claim(id);
            let members = expand_cluster(
                &[point],
                &neighbours,
                &mut visited,
                self.min_pts,
                self.epsilon,
            );

            if members.len() >= self.min_pts {
                debug!(
                    cluster = clusters.len(),
                    seed = %point.identity(),
                    size = members.len(),
                    "cluster discovered"
                );
                assigned.extend(members.iter().map(|&p| p.identity()));
                clusters.push(members);
            } else {
                trace!(
                    seed = %point.identity(),
                    size = members.len(),
                    "expansion below min_pts, dropped"
                );
            }
        }

        debug!(
            points = points.len(),
            clusters = clusters.len(),
            epsilon = self.epsilon,
            min_pts = self.min_pts,
            "dbscan finished"
        );
        Ok(clusters)
    }
}

/// Cluster `points` with DBSCAN.
///
/// Shorthand for `Dbscan::new(epsilon, min_pts).cluster(points)`.
///
/// ```rust
/// use dbscan::{cluster, NamedPoint};
///
/// let points: Vec<NamedPoint> = [1.0, 0.5, 0.0, 5.0, 4.5, 4.0]
///     .iter()
///     .map(|&x| NamedPoint::new(x.to_string(), [x]))
///     .collect();
///
/// let clusters = cluster(2, 1.0, &points).unwrap();
/// assert_eq!(clusters.len(), 2);
/// assert!(clusters.iter().all(|c| c.len() == 3));
/// ```
pub fn cluster<P: Point>(min_pts: usize, epsilon: f64, points: &[P]) -> Result<Vec<Vec<&P>>> {
    Dbscan::new(epsilon, min_pts).cluster(points)
}

/// Find every candidate within `epsilon` of `point`, excluding `point` itself.
///
/// The boundary is inclusive. Distance is always measured as
/// `candidate.distance_to(point)`. This is a linear scan; callers pay O(n)
/// per query.
pub fn find_neighbours<'a, P>(
    point: &P,
    candidates: impl IntoIterator<Item = &'a P>,
    epsilon: f64,
) -> Vec<&'a P>
where
    P: Point + 'a,
{
    let id = point.identity();
    candidates
        .into_iter()
        .filter(|candidate| candidate.identity() != id && candidate.distance_to(point) <= epsilon)
        .collect()
}

/// Grow `cluster` through the frontier `neighbours`.
///
/// Only the frontier is searched when testing whether a frontier point is
/// core. A core frontier point is marked clustered and merges its frontier
/// neighbours, but is not merged itself. Every returned member is marked
/// clustered in `visited`; points claimed outside this expansion are never
/// merged.
///
/// Members come back in the order they joined the cluster.
pub fn expand_cluster<'a, P: Point>(
    cluster: &[&'a P],
    neighbours: &[&'a P],
    visited: &mut VisitationMap<'a>,
    min_pts: usize,
    epsilon: f64,
) -> Vec<&'a P> {
    // Merged points must not extend the walk.
    let frontier = neighbours.to_vec();

    let mut members = Members::with_capacity(cluster.len() + frontier.len());
    let mut claimed_here: HashSet<Cow<'a, str>> = HashSet::new();
    for &point in cluster {
        members.insert(point);
    }

    for &point in &frontier {
        let id = point.identity();
        match visited.get(&id) {
            None => {
                let local = find_neighbours(point, frontier.iter().copied(), epsilon);
                if local.len() + 1 >= min_pts {
                    claimed_here.insert(id.clone());
                    visited.claim(id);
                    for neighbour in local {
                        let nid = neighbour.identity();
                        if claimed_here.contains(&nid) || !visited.is_clustered(&nid) {
                            members.insert(neighbour);
                        }
                    }
                }
            }
            Some(Visit::Noise) if !members.contains(&id) => {
                visited.claim(id);
                members.insert(point);
            }
            Some(_) => {}
        }
    }

    for point in &members.order {
        visited.claim(point.identity());
    }
    members.order
}

/// Reject inputs in which two points share an identity.
fn ensure_unique<P: Point>(points: &[P]) -> Result<()> {
    let mut seen: HashSet<Cow<'_, str>> = HashSet::with_capacity(points.len());
    for point in points {
        let id = point.identity();
        if seen.contains(&id) {
            return Err(Error::DuplicateIdentity {
                identity: id.into_owned(),
            });
        }
        seen.insert(id);
    }
    Ok(())
}

/// Per-point state recorded during one clustering call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Visited but not dense enough; a later expansion may still claim it.
    Noise,
    /// Claimed by a cluster. Permanent.
    Clustered,
}

/// Identity-keyed visitation state for one clustering call.
///
/// Unvisited points have no entry. An entry moves from [`Visit::Noise`] to
/// [`Visit::Clustered`] at most once and never back.
#[derive(Debug, Default, Clone)]
pub struct VisitationMap<'a> {
    entries: HashMap<Cow<'a, str>, Visit>,
}

impl<'a> VisitationMap<'a> {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty map sized for `n` points.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(n),
        }
    }

    /// State recorded for `identity`, if it has been visited.
    pub fn get(&self, identity: &str) -> Option<Visit> {
        self.entries.get(identity).copied()
    }

    /// Whether `identity` has been claimed by a cluster.
    pub fn is_clustered(&self, identity: &str) -> bool {
        self.get(identity) == Some(Visit::Clustered)
    }

    /// Number of visited points.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no point has been visited yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn claim(&mut self, identity: Cow<'a, str>) {
        self.entries.insert(identity, Visit::Clustered);
    }

    // Never downgrades a claimed point.
    fn mark_noise(&mut self, identity: Cow<'a, str>) {
        self.entries.entry(identity).or_insert(Visit::Noise);
    }
}

/// Identity-deduplicated cluster members in insertion order.
struct Members<'a, P> {
    order: Vec<&'a P>,
    seen: HashSet<Cow<'a, str>>,
}

impl<'a, P: Point> Members<'a, P> {
    fn with_capacity(n: usize) -> Self {
        Self {
            order: Vec::with_capacity(n),
            seen: HashSet::with_capacity(n),
        }
    }

    fn contains(&self, identity: &str) -> bool {
        self.seen.contains(identity)
    }

    fn insert(&mut self, point: &'a P) {
        if self.seen.insert(point.identity()) {
            self.order.push(point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A position on the real line, named by its value.
    #[derive(Debug, Clone, Copy)]
    struct Scalar(f64);

    impl Point for Scalar {
        fn identity(&self) -> Cow<'_, str> {
            Cow::Owned(self.0.to_string())
        }

        fn distance_to(&self, other: &Self) -> f64 {
            (other.0 - self.0).abs()
        }
    }

    fn scalars(values: &[f64]) -> Vec<Scalar> {
        values.iter().copied().map(Scalar).collect()
    }

    fn positions(cluster: &[&Scalar]) -> Vec<f64> {
        let mut out: Vec<f64> = cluster.iter().map(|p| p.0).collect();
        out.sort_by(|a, b| a.partial_cmp(b).unwrap());
        out
    }

    #[test]
    fn test_find_neighbours() {
        let points = scalars(&[0.0, 1.0, -1.0, 1.5, -0.5]);
        let neighbours = find_neighbours(&points[0], &points, 1.01);
        assert_eq!(neighbours.len(), 3);
    }

    #[test]
    fn test_find_neighbours_boundary_inclusive() {
        let points = scalars(&[0.0, 1.0]);
        let neighbours = find_neighbours(&points[0], &points, 1.0);
        assert_eq!(positions(&neighbours), vec![1.0]);

        let neighbours = find_neighbours(&points[0], &points, 0.999);
        assert!(neighbours.is_empty());
    }

    #[test]
    fn test_find_neighbours_excludes_self_at_zero_epsilon() {
        let points = scalars(&[3.0, 4.0]);
        assert!(find_neighbours(&points[0], &points, 0.0).is_empty());
    }

    #[test]
    fn test_expand_cluster() {
        let points = scalars(&[0.0, 1.0, 2.0, 2.1, 5.0]);
        let frontier: Vec<&Scalar> = points.iter().collect();
        let mut visited = VisitationMap::new();

        let cluster = expand_cluster(&[], &frontier, &mut visited, 3, 1.0);

        assert_eq!(cluster.len(), 4);
        assert_eq!(positions(&cluster), vec![0.0, 1.0, 2.0, 2.1]);
        assert!(visited.is_clustered("2.1"));
        assert_eq!(visited.get("5"), None);
    }

    #[test]
    fn test_expand_cluster_promotes_noise() {
        let points = scalars(&[0.0, 1.0]);
        let mut visited = VisitationMap::new();
        visited.claim(points[0].identity());
        visited.mark_noise(points[1].identity());

        let cluster = expand_cluster(&[&points[0]], &[&points[1]], &mut visited, 2, 1.0);

        assert_eq!(positions(&cluster), vec![0.0, 1.0]);
        assert_eq!(visited.get("1"), Some(Visit::Clustered));
    }

    #[test]
    fn test_expand_cluster_skips_points_claimed_elsewhere() {
        let points = scalars(&[0.0, 0.5, 0.6, 1.0]);
        let mut visited = VisitationMap::new();
        visited.claim(points[3].identity());

        let frontier = [&points[1], &points[2], &points[3]];
        let cluster = expand_cluster(&[&points[0]], &frontier, &mut visited, 2, 1.0);

        assert_eq!(positions(&cluster), vec![0.0, 0.5, 0.6]);
    }

    #[test]
    fn test_expand_cluster_core_point_not_merged() {
        // 0.5 is core within the frontier but neither of its frontier
        // neighbours is, so nothing lists it.
        let points = scalars(&[0.0, 0.5, 1.0, -0.4]);
        let mut visited = VisitationMap::new();

        let frontier = [&points[1], &points[2], &points[3]];
        let cluster = expand_cluster(&[&points[0]], &frontier, &mut visited, 3, 1.0);

        assert_eq!(positions(&cluster), vec![-0.4, 0.0, 1.0]);
        assert!(visited.is_clustered("0.5"));
        assert!(visited.is_clustered("-0.4"));
    }

    #[test]
    fn test_dbscan_core_point_not_merged() {
        // 0.5 reseeds at the top level, but every neighbour is taken.
        let points = scalars(&[0.0, 0.5, 1.0, -0.4]);
        let clusters = cluster(3, 1.0, &points).unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(positions(&clusters[0]), vec![-0.4, 0.0, 1.0]);
    }

    #[test]
    fn test_expand_cluster_bounded_recall() {
        // 1.5 neighbours 0.5 and 1.0 but not the seed, so it is outside the
        // frontier and this expansion never reaches it.
        let points = scalars(&[0.0, 0.5, 1.0, 1.5]);
        let mut visited = VisitationMap::new();
        visited.claim(points[0].identity());

        let neighbours = find_neighbours(&points[0], &points, 1.0);
        let cluster = expand_cluster(&[&points[0]], &neighbours, &mut visited, 2, 1.0);

        assert_eq!(positions(&cluster), vec![0.0, 0.5, 1.0]);
        assert_eq!(visited.get("1.5"), None);
    }

    #[test]
    fn test_dbscan_two_clusters() {
        let points = scalars(&[1.0, 0.5, 0.0, 5.0, 4.5, 4.0]);
        let clusters = cluster(2, 1.0, &points).unwrap();

        assert_eq!(clusters.len(), 2);
        assert_eq!(positions(&clusters[0]), vec![0.0, 0.5, 1.0]);
        assert_eq!(positions(&clusters[1]), vec![4.0, 4.5, 5.0]);
    }

    #[test]
    fn test_dbscan_seed_comes_first() {
        let points = scalars(&[1.0, 0.5, 0.0]);
        let clusters = cluster(2, 1.0, &points).unwrap();
        assert_eq!(clusters[0][0].0, 1.0);
    }

    #[test]
    fn test_dbscan_empty() {
        let points: Vec<Scalar> = vec![];
        let clusters = cluster(3, 1.0, &points).unwrap();
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_dbscan_all_noise() {
        let points = scalars(&[0.0, 1.0, 2.0]);
        let clusters = cluster(5, 0.1, &points).unwrap();
        assert!(clusters.is_empty());

        let labels = Dbscan::new(0.1, 5).labels(&points).unwrap();
        assert_eq!(labels, vec![None, None, None]);
    }

    #[test]
    fn test_dbscan_min_pts_one() {
        // Every point is core. 0.5 is claimed inside the first expansion
        // without joining it, then seeds its own cluster.
        let points = scalars(&[0.0, 0.5, 10.0]);
        let clusters = cluster(1, 1.0, &points).unwrap();

        assert_eq!(clusters.len(), 3);
        assert_eq!(positions(&clusters[0]), vec![0.0]);
        assert_eq!(positions(&clusters[1]), vec![0.5]);
        assert_eq!(positions(&clusters[2]), vec![10.0]);
    }

    #[test]
    fn test_dbscan_clusters_are_disjoint() {
        let points = scalars(&[0.0, 0.4, 0.8, 1.2, 1.6, 2.0, 2.4, 9.0]);
        let clusters = cluster(2, 0.5, &points).unwrap();

        let mut seen = HashSet::new();
        for cluster in &clusters {
            assert!(cluster.len() >= 2);
            for p in cluster {
                assert!(seen.insert(p.identity().into_owned()));
            }
        }
        assert!(!seen.contains("9"));
    }

    #[test]
    fn test_dbscan_repeatable() {
        let points = scalars(&[0.0, 0.3, 0.6, 0.9, 3.0, 3.2, 3.4, 7.0]);
        let model = Dbscan::new(0.5, 3);

        let first = model.cluster(&points).unwrap();
        let second = model.cluster(&points).unwrap();

        fn ids(clusters: &[Vec<&Scalar>]) -> Vec<Vec<String>> {
            clusters
                .iter()
                .map(|c| c.iter().map(|p| p.identity().into_owned()).collect())
                .collect()
        }
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_dbscan_labels() {
        let points = scalars(&[1.0, 0.5, 0.0, 20.0, 5.0, 4.5, 4.0]);
        let labels = Dbscan::new(1.0, 2).labels(&points).unwrap();

        assert_eq!(
            labels,
            vec![Some(0), Some(0), Some(0), None, Some(1), Some(1), Some(1)]
        );
    }

    #[test]
    fn test_dbscan_zero_epsilon() {
        let points = scalars(&[0.0, 1.0]);
        assert!(cluster(2, 0.0, &points).unwrap().is_empty());
        assert_eq!(cluster(1, 0.0, &points).unwrap().len(), 2);
    }

    #[test]
    fn test_dbscan_invalid_params() {
        let points = scalars(&[0.0]);

        let err = cluster(0, 1.0, &points).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            }
        );

        assert!(cluster(3, -1.0, &points).is_err());
        assert!(cluster(3, f64::NAN, &points).is_err());

        // Parameters are checked even when there is nothing to cluster.
        let empty: Vec<Scalar> = vec![];
        assert!(cluster(0, 1.0, &empty).is_err());
    }

    #[test]
    fn test_dbscan_duplicate_identity() {
        let points = scalars(&[0.0, 1.0, 0.0]);
        let err = cluster(2, 1.0, &points).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateIdentity {
                identity: "0".to_string()
            }
        );
    }

    #[test]
    fn test_dbscan_builder() {
        let model = Dbscan::default().with_epsilon(2.0).with_min_pts(4);
        assert_eq!(model.epsilon(), 2.0);
        assert_eq!(model.min_pts(), 4);
        assert!(model.validate().is_ok());
        assert_eq!(Dbscan::default(), Dbscan::new(0.5, 5));
    }

    /// Distance is only finite looking down the line: `a.distance_to(b)` is
    /// `a - b` when `a >= b`.
    #[derive(Debug)]
    struct Downhill(f64);

    impl Point for Downhill {
        fn identity(&self) -> Cow<'_, str> {
            Cow::Owned(self.0.to_string())
        }

        fn distance_to(&self, other: &Self) -> f64 {
            if self.0 >= other.0 {
                self.0 - other.0
            } else {
                f64::INFINITY
            }
        }
    }

    #[test]
    fn test_distance_measured_from_candidate() {
        let points = [Downhill(0.0), Downhill(1.0)];

        // 1.0.distance_to(0.0) is finite.
        let from_low = find_neighbours(&points[0], &points, 1.0);
        assert_eq!(from_low.len(), 1);

        // 0.0.distance_to(1.0) is not.
        let from_high = find_neighbours(&points[1], &points, 1.0);
        assert!(from_high.is_empty());
    }

    #[test]
    fn test_visitation_map_never_downgrades() {
        let mut visited = VisitationMap::new();
        assert!(visited.is_empty());

        visited.claim(Cow::Borrowed("a"));
        visited.mark_noise(Cow::Borrowed("a"));
        visited.mark_noise(Cow::Borrowed("b"));

        assert_eq!(visited.get("a"), Some(Visit::Clustered));
        assert_eq!(visited.get("b"), Some(Visit::Noise));
        assert_eq!(visited.len(), 2);
    }
}
