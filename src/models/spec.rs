//! Problem instance.

use crate::error::{Error, Result};

use super::Node;

/// Default run seed.
pub const DEFAULT_SEED: u64 = 0xdead_beef;

/// Largest accepted absolute coordinate. Squared differences of two such
/// coordinates stay finite in `f32`.
pub const MAX_COORDINATE: f64 = 1e18;

/// An immutable capacitated vehicle routing instance.
///
/// Holds the node list (index 0 = depot), the capacity shared by every
/// vehicle, and the run seed from which per-thread random streams derive.
///
/// # Examples
///
/// ```
/// use u_colony::models::{Node, Spec};
///
/// let spec = Spec::new(
///     vec![Node::depot(0.0, 0.0), Node::new(3.0, 4.0, 10), Node::new(6.0, 8.0, 20)],
///     30,
/// )
/// .unwrap()
/// .with_seed(7);
/// assert_eq!(spec.dimension(), 3);
/// assert_eq!(spec.capacity(), 30);
/// assert_eq!(spec.seed(), 7);
/// assert_eq!(spec.demand(2), 20);
/// ```
#[derive(Debug, Clone)]
pub struct Spec {
    nodes: Vec<Node>,
    capacity: i32,
    seed: u64,
}

impl Spec {
    /// Creates a validated instance.
    ///
    /// Rejects fewer than two nodes, a depot with non-zero demand, negative
    /// demands, non-finite coordinates or coordinates beyond
    /// [`MAX_COORDINATE`], a non-positive capacity, any single demand larger
    /// than the capacity, and a total demand that does not fit in `i32`.
    pub fn new(nodes: Vec<Node>, capacity: i32) -> Result<Self> {
        if nodes.len() < 2 {
            return Err(Error::invalid_spec(format!(
                "dimension must be at least 2, got {}",
                nodes.len()
            )));
        }
        if capacity <= 0 {
            return Err(Error::invalid_spec(format!(
                "capacity must be positive, got {capacity}"
            )));
        }
        if nodes[0].demand() != 0 {
            return Err(Error::invalid_spec(format!(
                "depot demand must be 0, got {}",
                nodes[0].demand()
            )));
        }
        for (i, node) in nodes.iter().enumerate() {
            if !node.is_finite() {
                return Err(Error::invalid_spec(format!(
                    "node {i} has non-finite coordinates"
                )));
            }
            if node.x().abs() > MAX_COORDINATE || node.y().abs() > MAX_COORDINATE {
                return Err(Error::invalid_spec(format!(
                    "node {i} coordinates ({}, {}) exceed {MAX_COORDINATE:e}",
                    node.x(),
                    node.y()
                )));
            }
            if node.demand() < 0 {
                return Err(Error::invalid_spec(format!(
                    "node {i} has negative demand {}",
                    node.demand()
                )));
            }
            if node.demand() > capacity {
                return Err(Error::invalid_spec(format!(
                    "node {i} demand {} exceeds capacity {capacity}",
                    node.demand()
                )));
            }
        }
        let spec = Self {
            nodes,
            capacity,
            seed: DEFAULT_SEED,
        };
        if spec.total_demand() > i64::from(i32::MAX) {
            return Err(Error::invalid_spec(format!(
                "total demand {} does not fit in i32",
                spec.total_demand()
            )));
        }
        Ok(spec)
    }

    /// Sets the run seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// All nodes, depot first.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes including the depot.
    pub fn dimension(&self) -> usize {
        self.nodes.len()
    }

    /// Number of demand points (excluding the depot).
    pub fn num_customers(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Vehicle capacity.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Demand of node `i`.
    pub fn demand(&self, i: usize) -> i32 {
        self.nodes[i].demand()
    }

    /// Run seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sum of all demands.
    pub fn total_demand(&self) -> i64 {
        self.nodes.iter().map(|n| i64::from(n.demand())).sum()
    }
}
