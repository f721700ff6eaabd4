//! Greedy capacity split of a giant tour.
//!
//! # Algorithm
//!
//! Walk the tour in order and append each node to the open path. When the
//! next demand would overflow the vehicle, close the path at the depot and
//! open a new one. Cut points are never revisited, so the result can cost
//! more than an optimal shortest-path split of the same tour.
//!
//! # Complexity
//!
//! O(n) for a tour of n demand points.

use crate::distance::DistanceMatrix;
use crate::models::{Path, Spec};

/// Cuts `tour` into capacity-feasible paths, keeping the tour order.
///
/// # Examples
///
/// ```
/// use u_colony::baseline::split_by_capacity;
/// use u_colony::distance::{real, DistanceMatrix};
/// use u_colony::models::{Node, Spec};
///
/// let spec = Spec::new(
///     vec![
///         Node::depot(0.0, 0.0),
///         Node::new(1.0, 0.0, 2),
///         Node::new(2.0, 0.0, 2),
///         Node::new(3.0, 0.0, 2),
///     ],
///     4,
/// )
/// .unwrap();
/// let dm = DistanceMatrix::from_nodes(spec.nodes(), real);
///
/// let paths = split_by_capacity(&[1, 2, 3], &spec, &dm);
/// assert_eq!(paths.len(), 2);
/// assert_eq!(paths[0].nodes(), &[1, 2]);
/// assert_eq!(paths[1].nodes(), &[3]);
/// ```
pub fn split_by_capacity(tour: &[usize], spec: &Spec, real: &DistanceMatrix<f32>) -> Vec<Path> {
    let capacity = i64::from(spec.capacity());
    let mut paths = Vec::new();
    let mut open = Vec::new();
    let mut load = 0i64;

    for &node in tour {
        let demand = i64::from(spec.demand(node));
        if !open.is_empty() && load + demand > capacity {
            paths.push(Path::new(std::mem::take(&mut open), spec, real));
            load = 0;
        }
        open.push(node);
        load += demand;
    }
    if !open.is_empty() {
        paths.push(Path::new(open, spec, real));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::real;
    use crate::evaluation;
    use crate::models::Node;

    fn spec(demands: &[i32], capacity: i32) -> (Spec, DistanceMatrix<f32>) {
        let mut nodes = vec![Node::depot(0.0, 0.0)];
        nodes.extend(
            demands
                .iter()
                .enumerate()
                .map(|(i, &d)| Node::new(i as f64 + 1.0, 0.0, d)),
        );
        let spec = Spec::new(nodes, capacity).expect("valid");
        let dm = DistanceMatrix::from_nodes(spec.nodes(), real);
        (spec, dm)
    }

    #[test]
    fn test_split_single_vehicle() {
        let (spec, dm) = spec(&[1, 1, 1], 10);
        let paths = split_by_capacity(&[3, 1, 2], &spec, &dm);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes(), &[3, 1, 2]);
        assert_eq!(paths[0].load(), 3);
    }

    #[test]
    fn test_split_cuts_at_capacity() {
        let (spec, dm) = spec(&[3, 2, 4, 1, 5], 5);
        let paths = split_by_capacity(&[1, 2, 3, 4, 5], &spec, &dm);
        let groups: Vec<&[usize]> = paths.iter().map(|p| p.nodes()).collect();
        assert_eq!(groups, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);
        assert!(paths.iter().all(|p| p.load() <= 5));
        assert!(evaluation::validate(&spec, &paths).is_empty());
    }

    #[test]
    fn test_split_full_demands_one_per_path() {
        let (spec, dm) = spec(&[4, 4, 4], 4);
        let paths = split_by_capacity(&[2, 3, 1], &spec, &dm);
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|p| p.len() == 1));
    }

    #[test]
    fn test_split_empty_tour() {
        let (spec, dm) = spec(&[1], 4);
        assert!(split_by_capacity(&[], &spec, &dm).is_empty());
    }
}
