//! Clarke-Wright savings.
//!
//! # Algorithm
//!
//! Serving two demand points on one vehicle instead of two saves
//!
//! ```text
//! s(i, j) = d(i, 0) + d(0, j) - d(i, j)
//! ```
//!
//! Every pair of demand points whose saving exceeds a small threshold is
//! kept, and the list is sorted by decreasing gain.
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use crate::distance::DistanceMatrix;
use crate::models::DEPOT;

/// A merge candidate between two demand points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saving {
    /// First endpoint (always the smaller index).
    pub n1: usize,
    /// Second endpoint.
    pub n2: usize,
    /// Distance saved by linking `n1` and `n2` directly.
    pub gain: f32,
}

/// Computes every saving above `threshold`, sorted by decreasing gain.
///
/// Pairs are unordered (`n1 < n2`); ties are broken by node indices so the
/// order is deterministic.
///
/// # Examples
///
/// ```
/// use u_colony::models::Node;
/// use u_colony::distance::{real, DistanceMatrix};
/// use u_colony::savings::make_savings;
///
/// let nodes = vec![
///     Node::depot(0.0, 0.0),
///     Node::new(3.0, 0.0, 1),
///     Node::new(4.0, 0.0, 1),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes, real);
/// let savings = make_savings(&dm, 1e-3);
/// assert_eq!(savings.len(), 1);
/// assert!((savings[0].gain - 6.0).abs() < 1e-5);
/// ```
pub fn make_savings(real: &DistanceMatrix<f32>, threshold: f32) -> Vec<Saving> {
    let n = real.size();
    let mut savings = Vec::with_capacity(n.saturating_sub(1) * n.saturating_sub(2) / 2);
    for i in 1..n {
        for j in (i + 1)..n {
            let gain = real.get(i, DEPOT) + real.get(DEPOT, j) - real.get(i, j);
            if gain > threshold {
                savings.push(Saving { n1: i, n2: j, gain });
            }
        }
    }

    savings.sort_by(|a, b| {
        b.gain
            .total_cmp(&a.gain)
            .then(a.n1.cmp(&b.n1))
            .then(a.n2.cmp(&b.n2))
    });
    savings
}
