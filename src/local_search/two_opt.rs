//! Intra-path 2-opt improvement.
//!
//! # Algorithm
//!
//! For each pair of positions i < j in a path, compute the change in cost
//! from reversing the segment between them:
//!
//! ```text
//! delta = d(p[i-1], p[j]) + d(p[i], p[j+1]) - d(p[i-1], p[i]) - d(p[j], p[j+1])
//! ```
//!
//! where positions -1 and len are the depot. If delta < 0, reverse
//! `p[i..=j]` and continue scanning. Repeat until a full pass finds no
//! improving reversal (first-improvement strategy).
//!
//! # Complexity
//!
//! O(n²) per pass, O(n³) worst case for convergence.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::DistanceMatrix;
use crate::models::Path;

use super::improves;

/// Applies 2-opt to `path` in place until no improving reversal remains.
///
/// Returns `true` if the visit order changed. The cached cost is
/// recomputed from scratch afterwards; if rounding makes the new order
/// look worse, the original order is kept.
///
/// # Examples
///
/// ```
/// use u_colony::models::{Node, Path, Spec};
/// use u_colony::distance::{real, DistanceMatrix};
/// use u_colony::local_search::two_opt;
///
/// let spec = Spec::new(
///     vec![
///         Node::depot(0.0, 0.0),
///         Node::new(1.0, 0.0, 1),
///         Node::new(2.0, 0.0, 1),
///         Node::new(3.0, 0.0, 1),
///     ],
///     10,
/// )
/// .unwrap();
/// let dm = DistanceMatrix::from_nodes(spec.nodes(), real);
///
/// // 0→3→1→2→0 costs 3 + 2 + 1 + 2 = 8; the best order costs 6.
/// let mut path = Path::new(vec![3, 1, 2], &spec, &dm);
/// assert!(two_opt(&mut path, &dm));
/// assert!((path.cost() - 6.0).abs() < 1e-5);
/// ```
pub fn two_opt(path: &mut Path, real: &DistanceMatrix<f32>) -> bool {
    if path.len() < 2 {
        return false;
    }

    let before_nodes = path.nodes().to_vec();
    let before_cost = path.cost();
    let mut changed = false;
    let mut improved = true;

    while improved {
        improved = false;
        let n = path.len();
        for i in 0..n - 1 {
            for j in i + 1..n {
                let (delta, removed) = two_opt_delta(path, real, i, j);
                if improves(delta, removed) {
                    path.nodes_mut()[i..=j].reverse();
                    improved = true;
                    changed = true;
                }
            }
        }
    }

    if !changed {
        return false;
    }
    path.recompute_cost(real);
    if path.cost() > before_cost {
        *path.nodes_mut() = before_nodes;
        path.set_cost(before_cost);
        return false;
    }
    true
}

/// Cost change from reversing `path[i..=j]`, with the cost of the two
/// removed edges.
fn two_opt_delta(path: &Path, real: &DistanceMatrix<f32>, i: usize, j: usize) -> (f32, f32) {
    let (i, j) = (i as isize, j as isize);
    let prev = path.node_or_depot(i - 1);
    let first = path.node_or_depot(i);
    let last = path.node_or_depot(j);
    let next = path.node_or_depot(j + 1);

    let removed = real.get(prev, first) + real.get(last, next);
    let added = real.get(prev, last) + real.get(first, next);
    (added - removed, removed)
}
