//! Single-vehicle path type.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;

use super::Spec;

/// Index of the depot node.
pub const DEPOT: usize = 0;

/// An ordered sequence of demand points served by one vehicle.
///
/// A path starts and ends at the depot; the depot is not stored in
/// `nodes`. Load and real-score cost are cached alongside.
///
/// # Examples
///
/// ```
/// use u_colony::models::{Node, Path, Spec};
/// use u_colony::distance::{real, DistanceMatrix};
///
/// let spec = Spec::new(
///     vec![Node::depot(0.0, 0.0), Node::new(1.0, 0.0, 2), Node::new(2.0, 0.0, 3)],
///     10,
/// )
/// .unwrap();
/// let dm = DistanceMatrix::from_nodes(spec.nodes(), real);
/// let path = Path::new(vec![1, 2], &spec, &dm);
/// assert_eq!(path.load(), 5);
/// assert!((path.cost() - 4.0).abs() < 1e-6);
/// assert_eq!(path.hops().collect::<Vec<_>>(), vec![0, 1, 2, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    nodes: Vec<usize>,
    load: i32,
    cost: f32,
}

impl Path {
    /// Creates a path over `nodes`, computing its load and real cost.
    pub fn new(nodes: Vec<usize>, spec: &Spec, real: &DistanceMatrix<f32>) -> Self {
        let load = nodes.iter().map(|&n| spec.demand(n)).sum();
        let cost = real.closed_path_cost(DEPOT, &nodes);
        Self { nodes, load, cost }
    }

    /// Creates a path from already-known load and cost.
    pub fn from_parts(nodes: Vec<usize>, load: i32, cost: f32) -> Self {
        Self { nodes, load, cost }
    }

    /// Demand points in visit order (depot excluded).
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Mutable access to the visit order. Callers must keep load and cost
    /// in sync via [`Path::set_load`] and [`Path::set_cost`].
    pub fn nodes_mut(&mut self) -> &mut Vec<usize> {
        &mut self.nodes
    }

    /// Number of demand points.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the path visits no demand point.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Cumulative demand.
    pub fn load(&self) -> i32 {
        self.load
    }

    /// Cumulative real-score cost, depot hops included.
    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn set_load(&mut self, load: i32) {
        self.load = load;
    }

    pub fn set_cost(&mut self, cost: f32) {
        self.cost = cost;
    }

    /// Recomputes the cached cost from scratch.
    pub fn recompute_cost(&mut self, real: &DistanceMatrix<f32>) {
        self.cost = real.closed_path_cost(DEPOT, &self.nodes);
    }

    /// Node sequence bounded by the depot at both ends.
    pub fn hops(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(DEPOT)
            .chain(self.nodes.iter().copied())
            .chain(std::iter::once(DEPOT))
    }

    /// Node at `pos`, where `pos` may be one past either end (the depot).
    #[inline]
    pub(crate) fn node_or_depot(&self, pos: isize) -> usize {
        if pos < 0 || pos as usize >= self.nodes.len() {
            DEPOT
        } else {
            self.nodes[pos as usize]
        }
    }
}
