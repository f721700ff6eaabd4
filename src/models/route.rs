//! Complete solution type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distance::{DistanceCache, ScoreMode};

use super::{Path, DEPOT};

/// A complete solution: every vehicle path, concatenated with shared depot
/// hops, plus the traversed edge set and the cost under each additive score.
///
/// Routes are values: the search replaces the best-known route wholesale
/// and never edits one in place.
///
/// # Examples
///
/// ```
/// use u_colony::models::{Node, Path, Route, Spec};
/// use u_colony::distance::DistanceCache;
///
/// let spec = Spec::new(
///     vec![Node::depot(0.0, 0.0), Node::new(3.0, 4.0, 1), Node::new(-3.0, 4.0, 1)],
///     1,
/// )
/// .unwrap();
/// let cache = DistanceCache::new(&spec);
/// let route = Route::new(
///     vec![
///         Path::new(vec![1], &spec, cache.real()),
///         Path::new(vec![2], &spec, cache.real()),
///     ],
///     &cache,
/// );
/// assert_eq!(route.hops(), &[0, 1, 0, 2, 0]);
/// assert_eq!(route.external_sequence(), vec![1, 2, 1, 3, 1]);
/// assert!((route.exact_cost() - 20.0).abs() < 1e-9);
/// assert_eq!(route.to_string(), "1->2->1\n1->3->1\n");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    paths: Vec<Path>,
    hops: Vec<usize>,
    edges: Vec<(usize, usize)>,
    real_cost: f32,
    exact_cost: f64,
}

impl Route {
    /// Assembles a route from paths, dropping empty ones, and scores it.
    pub fn new(paths: Vec<Path>, cache: &DistanceCache) -> Self {
        let paths: Vec<Path> = paths.into_iter().filter(|p| !p.is_empty()).collect();

        let mut hops = Vec::with_capacity(cache.dimension() + paths.len() + 1);
        hops.push(DEPOT);
        for path in &paths {
            hops.extend_from_slice(path.nodes());
            hops.push(DEPOT);
        }

        let edges: Vec<(usize, usize)> = hops.windows(2).map(|w| edge_key(w[0], w[1])).collect();

        let real_cost = paths
            .iter()
            .map(|p| cache.real().closed_path_cost(DEPOT, p.nodes()))
            .sum();
        let exact_cost = paths
            .iter()
            .map(|p| cache.exact().closed_path_cost(DEPOT, p.nodes()))
            .sum();

        Self {
            paths,
            hops,
            edges,
            real_cost,
            exact_cost,
        }
    }

    /// Vehicle paths.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Number of vehicles used.
    pub fn num_paths(&self) -> usize {
        self.paths.len()
    }

    /// Full node sequence (0-based), depot at both ends and between paths.
    pub fn hops(&self) -> &[usize] {
        &self.hops
    }

    /// Node sequence in 1-based external numbering.
    pub fn external_sequence(&self) -> Vec<usize> {
        self.hops.iter().map(|&h| h + 1).collect()
    }

    /// Traversed edges as `(min, max)` node pairs, in travel order.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Sum of single-precision edge distances.
    pub fn real_cost(&self) -> f32 {
        self.real_cost
    }

    /// Sum of double-precision edge distances (the reported cost).
    pub fn exact_cost(&self) -> f64 {
        self.exact_cost
    }

    /// Cost under an additive score; `None` for [`ScoreMode::Fast`], whose
    /// squared distances do not sum to a route length.
    pub fn cost(&self, mode: ScoreMode) -> Option<f64> {
        match mode {
            ScoreMode::Exact => Some(self.exact_cost),
            ScoreMode::Real => Some(f64::from(self.real_cost)),
            ScoreMode::Fast => None,
        }
    }

    /// Number of demand points served.
    pub fn num_served(&self) -> usize {
        self.paths.iter().map(|p| p.len()).sum()
    }
}

/// One line per vehicle, 1-based: `1->a->b->1`.
impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for path in &self.paths {
            let mut first = true;
            for hop in path.hops() {
                if !first {
                    f.write_str("->")?;
                }
                write!(f, "{}", hop + 1)?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Undirected edge key.
#[inline]
pub fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
