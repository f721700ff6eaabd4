//! Inter-path single-node exchange.
//!
//! # Algorithm
//!
//! For every pair of paths (P, Q) and every node `u` in P, `v` in Q, swap
//! `u` and `v` in place. The move is feasible when both new loads fit the
//! vehicle capacity:
//!
//! ```text
//! load(P) - demand(u) + demand(v) <= capacity
//! load(Q) - demand(v) + demand(u) <= capacity
//! ```
//!
//! and its cost change is the sum of two edge deltas, one per path:
//!
//! ```text
//! delta_P = d(prev_u, v) + d(v, next_u) - d(prev_u, u) - d(u, next_u)
//! ```
//!
//! Each pass applies the single best improving swap; passes repeat until
//! none is left (best-improvement strategy).
//!
//! # Complexity
//!
//! O(n²) per pass, where n is the number of demand points.

use crate::distance::DistanceMatrix;
use crate::models::{Path, Spec};

use super::improves;

#[derive(Debug, Clone, Copy)]
struct Swap {
    p: usize,
    i: usize,
    q: usize,
    j: usize,
    delta_p: f32,
    delta_q: f32,
    removed: f32,
}

impl Swap {
    fn delta(&self) -> f32 {
        self.delta_p + self.delta_q
    }
}

/// Swaps single nodes between paths until no capacity-feasible swap
/// reduces the summed real cost.
///
/// Returns `true` if any path changed. Path loads and costs are kept in
/// sync; costs are recomputed from scratch once the fixed point is
/// reached, and the whole set is rolled back if rounding makes the
/// result look worse than the input.
///
/// # Examples
///
/// ```
/// use u_colony::models::{Node, Path, Spec};
/// use u_colony::distance::{real, DistanceMatrix};
/// use u_colony::local_search::one_exchange;
///
/// let spec = Spec::new(
///     vec![
///         Node::depot(0.0, 0.0),
///         Node::new(10.0, 0.0, 1),
///         Node::new(10.0, 1.0, 1),
///         Node::new(-10.0, 0.0, 1),
///         Node::new(-10.0, 1.0, 1),
///     ],
///     2,
/// )
/// .unwrap();
/// let dm = DistanceMatrix::from_nodes(spec.nodes(), real);
///
/// // Each path crosses the depot; swapping fixes both.
/// let mut paths = vec![
///     Path::new(vec![1, 3], &spec, &dm),
///     Path::new(vec![2, 4], &spec, &dm),
/// ];
/// let before: f32 = paths.iter().map(|p| p.cost()).sum();
/// assert!(one_exchange(&mut paths, &spec, &dm));
/// let after: f32 = paths.iter().map(|p| p.cost()).sum();
/// assert!(after < before);
/// ```
pub fn one_exchange(paths: &mut [Path], spec: &Spec, real: &DistanceMatrix<f32>) -> bool {
    if paths.len() < 2 {
        return false;
    }

    let snapshot = paths.to_vec();
    let before: f32 = paths.iter().map(Path::cost).sum();
    let mut changed = false;

    while let Some(swap) = find_best_swap(paths, spec, real) {
        apply_swap(paths, spec, &swap);
        changed = true;
    }

    if !changed {
        return false;
    }
    for path in paths.iter_mut() {
        path.recompute_cost(real);
    }
    let after: f32 = paths.iter().map(Path::cost).sum();
    if after > before {
        paths.clone_from_slice(&snapshot);
        return false;
    }
    true
}

fn find_best_swap(paths: &[Path], spec: &Spec, real: &DistanceMatrix<f32>) -> Option<Swap> {
    let capacity = i64::from(spec.capacity());
    let mut best: Option<Swap> = None;

    for p in 0..paths.len() {
        for q in (p + 1)..paths.len() {
            let (pp, qq) = (&paths[p], &paths[q]);
            for i in 0..pp.len() {
                let u = pp.nodes()[i];
                for j in 0..qq.len() {
                    let v = qq.nodes()[j];
                    let (du, dv) = (i64::from(spec.demand(u)), i64::from(spec.demand(v)));
                    if i64::from(pp.load()) - du + dv > capacity
                        || i64::from(qq.load()) - dv + du > capacity
                    {
                        continue;
                    }

                    let (delta_p, removed_p) = replace_delta(pp, real, i, v);
                    let (delta_q, removed_q) = replace_delta(qq, real, j, u);
                    let swap = Swap {
                        p,
                        i,
                        q,
                        j,
                        delta_p,
                        delta_q,
                        removed: removed_p + removed_q,
                    };
                    if improves(swap.delta(), swap.removed)
                        && best.as_ref().is_none_or(|b| swap.delta() < b.delta())
                    {
                        best = Some(swap);
                    }
                }
            }
        }
    }

    best
}

/// Cost change from putting `with` at position `pos` of `path`, with the
/// cost of the two edges it replaces.
fn replace_delta(
    path: &Path,
    real: &DistanceMatrix<f32>,
    pos: usize,
    with: usize,
) -> (f32, f32) {
    let pos = pos as isize;
    let prev = path.node_or_depot(pos - 1);
    let cur = path.node_or_depot(pos);
    let next = path.node_or_depot(pos + 1);
    let removed = real.get(prev, cur) + real.get(cur, next);
    (real.get(prev, with) + real.get(with, next) - removed, removed)
}

fn apply_swap(paths: &mut [Path], spec: &Spec, swap: &Swap) {
    let u = paths[swap.p].nodes()[swap.i];
    let v = paths[swap.q].nodes()[swap.j];
    let shift = spec.demand(v) - spec.demand(u);

    let pp = &mut paths[swap.p];
    pp.nodes_mut()[swap.i] = v;
    pp.set_load(pp.load() + shift);
    pp.set_cost(pp.cost() + swap.delta_p);

    let qq = &mut paths[swap.q];
    qq.nodes_mut()[swap.j] = u;
    qq.set_load(qq.load() - shift);
    qq.set_cost(qq.cost() + swap.delta_q);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::real;
    use crate::evaluation;
    use crate::models::Node;

    fn crossed(demands: [i32; 4], capacity: i32) -> (Spec, DistanceMatrix<f32>, Vec<Path>) {
        let spec = Spec::new(
            vec![
                Node::depot(0.0, 0.0),
                Node::new(10.0, 0.0, demands[0]),
                Node::new(10.0, 1.0, demands[1]),
                Node::new(-10.0, 0.0, demands[2]),
                Node::new(-10.0, 1.0, demands[3]),
            ],
            capacity,
        )
        .expect("valid");
        let dm = DistanceMatrix::from_nodes(spec.nodes(), real);
        let paths = vec![
            Path::new(vec![1, 3], &spec, &dm),
            Path::new(vec![2, 4], &spec, &dm),
        ];
        (spec, dm, paths)
    }

    fn total(paths: &[Path]) -> f32 {
        paths.iter().map(|p| p.cost()).sum()
    }

    #[test]
    fn test_exchange_uncrosses() {
        let (spec, dm, mut paths) = crossed([1, 1, 1, 1], 2);
        assert!(one_exchange(&mut paths, &spec, &dm));

        let mut groups: Vec<Vec<usize>> = paths
            .iter()
            .map(|p| {
                let mut n = p.nodes().to_vec();
                n.sort();
                n
            })
            .collect();
        groups.sort();
        assert_eq!(groups, vec![vec![1, 2], vec![3, 4]]);
        assert!(total(&paths) < 45.0);
        assert!(evaluation::validate(&spec, &paths).is_empty());
    }

    #[test]
    fn test_exchange_cost_matches_recompute() {
        let (spec, dm, mut paths) = crossed([1, 1, 1, 1], 2);
        one_exchange(&mut paths, &spec, &dm);
        for p in &paths {
            let fresh = dm.closed_path_cost(0, p.nodes());
            assert!((p.cost() - fresh).abs() < 1e-4);
            let load: i32 = p.nodes().iter().map(|&n| spec.demand(n)).sum();
            assert_eq!(p.load(), load);
        }
    }

    #[test]
    fn test_exchange_respects_capacity() {
        // Every improving swap moves unequal demands between two full paths.
        let (spec, dm, mut paths) = crossed([1, 1, 2, 2], 3);
        let before = paths.clone();
        assert!(!one_exchange(&mut paths, &spec, &dm));
        assert_eq!(paths, before);
    }

    #[test]
    fn test_exchange_single_path_noop() {
        let (spec, dm, _) = crossed([1, 1, 1, 1], 4);
        let mut paths = vec![Path::new(vec![1, 3, 2, 4], &spec, &dm)];
        assert!(!one_exchange(&mut paths, &spec, &dm));
    }

    #[test]
    fn test_exchange_idempotent() {
        let (spec, dm, mut paths) = crossed([1, 1, 1, 1], 2);
        one_exchange(&mut paths, &spec, &dm);
        let settled = paths.clone();
        assert!(!one_exchange(&mut paths, &spec, &dm));
        assert_eq!(paths, settled);
    }

    #[test]
    fn test_exchange_ignores_rounding_on_far_cluster() {
        let spec = Spec::new(
            vec![
                Node::depot(0.0, 0.0),
                Node::new(1e6, 1e6, 1),
                Node::new(1e6 + 1.0, 1e6, 1),
                Node::new(1e6 + 1.0, 1e6 + 1.0, 1),
                Node::new(1e6, 1e6 + 1.0, 1),
            ],
            2,
        )
        .expect("valid");
        let dm = DistanceMatrix::from_nodes(spec.nodes(), real);
        let mut paths = vec![
            Path::new(vec![1, 3], &spec, &dm),
            Path::new(vec![2, 4], &spec, &dm),
        ];
        let before = paths.clone();
        assert!(!one_exchange(&mut paths, &spec, &dm));
        assert_eq!(paths, before);
    }
}
