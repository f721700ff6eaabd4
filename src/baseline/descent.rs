//! Giant-tour descent baseline.
//!
//! # Algorithm
//!
//! Start from the demand points in index order. Each round visits every
//! position pair i < j and tries three moves on the tour:
//!
//! - move the node at i to position j
//! - move the node at j to position i
//! - reverse `tour[i..=j]`
//!
//! A move is kept as soon as it lowers the cost of the tour's capacity
//! split (first improvement), otherwise it is undone. Rounds repeat until
//! one changes nothing or `max_rounds` is reached. The final split is then
//! refined with [`improve_paths`].
//!
//! # Complexity
//!
//! O(n³) per round for n demand points: O(n²) moves, each re-split in O(n).

use crate::distance::{DistanceCache, DistanceMatrix};
use crate::error::Result;
use crate::evaluation;
use crate::local_search::{improve_paths, improves};
use crate::models::{Path, Route, Spec};

use super::split_by_capacity;

#[derive(Debug, Clone, Copy)]
enum Move {
    Forward,
    Backward,
    Reverse,
}

impl Move {
    const ALL: [Move; 3] = [Move::Forward, Move::Backward, Move::Reverse];

    fn apply(self, tour: &mut [usize], i: usize, j: usize) {
        match self {
            Move::Forward => tour[i..=j].rotate_left(1),
            Move::Backward => tour[i..=j].rotate_right(1),
            Move::Reverse => tour[i..=j].reverse(),
        }
    }

    fn undo(self, tour: &mut [usize], i: usize, j: usize) {
        match self {
            Move::Forward => tour[i..=j].rotate_right(1),
            Move::Backward => tour[i..=j].rotate_left(1),
            Move::Reverse => tour[i..=j].reverse(),
        }
    }
}

fn split_cost(tour: &[usize], spec: &Spec, real: &DistanceMatrix<f32>) -> f32 {
    split_by_capacity(tour, spec, real)
        .iter()
        .map(Path::cost)
        .sum()
}

/// Improves one giant tour by relocation and reversal, then splits it.
///
/// The result never costs more than splitting the index-order tour.
///
/// # Errors
///
/// Returns [`Error::Infeasible`](crate::Error::Infeasible) if the final
/// paths fail validation.
///
/// # Examples
///
/// ```
/// use u_colony::baseline::tour_descent;
/// use u_colony::distance::DistanceCache;
/// use u_colony::models::{Node, Spec};
///
/// let spec = Spec::new(
///     vec![
///         Node::depot(0.0, 0.0),
///         Node::new(3.0, 0.0, 1),
///         Node::new(1.0, 0.0, 1),
///         Node::new(2.0, 0.0, 1),
///     ],
///     10,
/// )
/// .unwrap();
/// let cache = DistanceCache::new(&spec);
/// let route = tour_descent(&spec, &cache, 20).unwrap();
/// assert_eq!(route.num_paths(), 1);
/// assert!((route.exact_cost() - 6.0).abs() < 1e-9);
/// ```
pub fn tour_descent(spec: &Spec, cache: &DistanceCache, max_rounds: usize) -> Result<Route> {
    let real = cache.real();
    let mut tour: Vec<usize> = (1..spec.dimension()).collect();
    let mut cost = split_cost(&tour, spec, real);
    let n = tour.len();
    let mut rounds = 0;

    while rounds < max_rounds {
        rounds += 1;
        let mut changed = false;
        for i in 0..n {
            for j in (i + 1)..n {
                for mv in Move::ALL {
                    mv.apply(&mut tour, i, j);
                    let trial = split_cost(&tour, spec, real);
                    if improves(trial - cost, cost) {
                        cost = trial;
                        changed = true;
                    } else {
                        mv.undo(&mut tour, i, j);
                    }
                }
            }
        }
        log::debug!("baseline.descent: round={rounds} cost={cost:.3}");
        if !changed {
            break;
        }
    }

    let mut paths = split_by_capacity(&tour, spec, real);
    improve_paths(&mut paths, spec, cache, false);
    evaluation::check(spec, &paths)?;
    let route = Route::new(paths, cache);

    log::info!(
        "baseline.descent: done rounds={rounds} cost={:.3} vehicles={}",
        route.exact_cost(),
        route.num_paths()
    );
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    fn zigzag() -> Spec {
        let xs = [1.0, 5.0, 2.0, 4.0, 3.0];
        let mut nodes = vec![Node::depot(0.0, 0.0)];
        nodes.extend(xs.iter().map(|&x| Node::new(x, 0.0, 1)));
        Spec::new(nodes, 10).expect("valid")
    }

    #[test]
    fn test_move_undo_restores_tour() {
        for mv in Move::ALL {
            let mut tour = vec![1, 2, 3, 4, 5];
            mv.apply(&mut tour, 1, 3);
            assert_ne!(tour, vec![1, 2, 3, 4, 5]);
            mv.undo(&mut tour, 1, 3);
            assert_eq!(tour, vec![1, 2, 3, 4, 5]);
        }
        let mut tour = vec![1, 2, 3, 4];
        Move::Forward.apply(&mut tour, 0, 2);
        assert_eq!(tour, vec![2, 3, 1, 4]);
        Move::Backward.apply(&mut tour, 0, 2);
        assert_eq!(tour, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_descent_untangles_line() {
        let spec = zigzag();
        let cache = DistanceCache::new(&spec);
        let start = split_cost(&[1, 2, 3, 4, 5], &spec, cache.real());
        assert!((start - 14.0).abs() < 1e-4);

        let route = tour_descent(&spec, &cache, 50).expect("run");
        assert_eq!(route.num_paths(), 1);
        assert!((route.exact_cost() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_descent_never_worse_than_index_order() {
        let mut nodes = vec![Node::depot(0.0, 0.0)];
        for i in 0..14 {
            let a = (i * 5 % 14) as f64 * std::f64::consts::TAU / 14.0;
            nodes.push(Node::new(25.0 * a.cos(), 25.0 * a.sin(), 1 + (i % 4) as i32));
        }
        let spec = Spec::new(nodes, 7).expect("valid");
        let cache = DistanceCache::new(&spec);
        let tour: Vec<usize> = (1..spec.dimension()).collect();
        let start = split_cost(&tour, &spec, cache.real());

        let route = tour_descent(&spec, &cache, 10).expect("run");
        assert!(route.real_cost() <= start + 1e-3);
        assert!(evaluation::validate(&spec, route.paths()).is_empty());
        assert_eq!(route.num_served(), 14);
    }

    #[test]
    fn test_descent_zero_rounds_only_refines() {
        let spec = zigzag();
        let cache = DistanceCache::new(&spec);
        let route = tour_descent(&spec, &cache, 0).expect("run");
        assert_eq!(route.num_served(), 5);
        assert!(route.real_cost() <= 14.0 + 1e-4);
    }
}
