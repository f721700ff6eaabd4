//! Pairwise scoring functions.
//!
//! Three numerically distinct scores are used:
//!
//! - [`exact`] — `f64` Euclidean distance, used for reported costs only.
//! - [`real`] — `f32` Euclidean distance, the additive edge cost during search.
//! - [`fast`] — `f32` squared Euclidean distance. Preserves the ordering of
//!   [`real`] but is not additive: never sum it into a route cost.

use serde::{Deserialize, Serialize};

use crate::models::Node;

/// Selects one of the pairwise scoring functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreMode {
    /// Double-precision Euclidean distance.
    Exact,
    /// Single-precision Euclidean distance.
    Real,
    /// Single-precision squared Euclidean distance.
    Fast,
}

/// Double-precision Euclidean distance.
///
/// ```
/// use u_colony::models::Node;
/// use u_colony::distance::exact;
///
/// let d = exact(&Node::depot(0.0, 0.0), &Node::new(3.0, 4.0, 1));
/// assert!((d - 5.0).abs() < 1e-12);
/// ```
pub fn exact(a: &Node, b: &Node) -> f64 {
    let dx = a.x() - b.x();
    let dy = a.y() - b.y();
    (dx * dx + dy * dy).sqrt()
}

/// Single-precision Euclidean distance (square root of [`fast`]).
pub fn real(a: &Node, b: &Node) -> f32 {
    fast(a, b).sqrt()
}

/// Single-precision squared Euclidean distance.
pub fn fast(a: &Node, b: &Node) -> f32 {
    let dx = (a.x() - b.x()) as f32;
    let dy = (a.y() - b.y()) as f32;
    dx * dx + dy * dy
}
