//! Demand point type.

use serde::{Deserialize, Serialize};

/// A location in a routing problem: planar coordinates plus a demand.
///
/// Node 0 is conventionally the depot and carries zero demand.
///
/// # Examples
///
/// ```
/// use u_colony::models::Node;
///
/// let depot = Node::depot(35.0, 35.0);
/// assert_eq!(depot.demand(), 0);
///
/// let n = Node::new(41.0, 49.0, 10);
/// assert_eq!(n.demand(), 10);
/// assert_eq!(n.x(), 41.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    x: f64,
    y: f64,
    demand: i32,
}

impl Node {
    /// Creates a new node.
    pub fn new(x: f64, y: f64, demand: i32) -> Self {
        Self { x, y, demand }
    }

    /// Creates a depot at the given coordinates (demand = 0).
    pub fn depot(x: f64, y: f64) -> Self {
        Self::new(x, y, 0)
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Units to deliver at this node.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
