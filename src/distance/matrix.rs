//! Dense distance matrix.

use crate::models::Node;

/// A dense n×n matrix of pairwise scores stored in row-major order.
///
/// The element type follows the scoring mode: `f64` for exact distances,
/// `f32` for the real and fast scores used during search.
///
/// # Examples
///
/// ```
/// use u_colony::models::Node;
/// use u_colony::distance::{real, DistanceMatrix};
///
/// let nodes = vec![
///     Node::depot(0.0, 0.0),
///     Node::new(3.0, 4.0, 10),
///     Node::new(6.0, 8.0, 20),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes, real);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-6);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix<T = f32> {
    data: Vec<T>,
    size: usize,
}

impl<T: Copy + Default> DistanceMatrix<T> {
    /// Creates a matrix of the given size, filled with `T::default()`.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![T::default(); size * size],
            size,
        }
    }

    /// Computes a symmetric matrix by applying `score` to every node pair.
    ///
    /// The diagonal is left at `T::default()`.
    pub fn from_nodes(nodes: &[Node], score: impl Fn(&Node, &Node) -> T) -> Self {
        let n = nodes.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = score(&nodes[i], &nodes[j]);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Returns the score from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> T {
        self.data[from * self.size + to]
    }

    /// Sets the score from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, value: T) {
        self.data[from * self.size + to] = value;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl<T: Copy + Default + PartialOrd> DistanceMatrix<T> {
    /// Returns the candidate closest to `from` (the first one on ties).
    ///
    /// Returns `None` if `candidates` is empty. Incomparable values (NaN)
    /// are treated as equal.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates.iter().copied().min_by(|&a, &b| {
            self.get(from, a)
                .partial_cmp(&self.get(from, b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

impl DistanceMatrix<f32> {
    /// Sum of scores along `depot → hops[0] → … → hops[n-1] → depot`.
    ///
    /// Only meaningful for an additive score (real, not fast).
    pub fn closed_path_cost(&self, depot: usize, hops: &[usize]) -> f32 {
        let Some((&first, _)) = hops.split_first() else {
            return 0.0;
        };
        let mut cost = self.get(depot, first);
        for w in hops.windows(2) {
            cost += self.get(w[0], w[1]);
        }
        cost + self.get(hops[hops.len() - 1], depot)
    }
}

impl DistanceMatrix<f64> {
    /// Double-precision counterpart of the `f32` `closed_path_cost`.
    pub fn closed_path_cost(&self, depot: usize, hops: &[usize]) -> f64 {
        let Some((&first, _)) = hops.split_first() else {
            return 0.0;
        };
        let mut cost = self.get(depot, first);
        for w in hops.windows(2) {
            cost += self.get(w[0], w[1]);
        }
        cost + self.get(hops[hops.len() - 1], depot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{exact, fast, real};

    fn sample_nodes() -> Vec<Node> {
        vec![
            Node::depot(0.0, 0.0),
            Node::new(3.0, 4.0, 10),
            Node::new(0.0, 8.0, 20),
        ]
    }

    #[test]
    fn test_from_nodes() {
        let dm = DistanceMatrix::from_nodes(&sample_nodes(), exact);
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert!(dm.get(0, 0).abs() < 1e-10);
        assert_eq!(dm.get(1, 2), dm.get(2, 1));
    }

    #[test]
    fn test_set_get() {
        let mut dm = DistanceMatrix::<f32>::new(3);
        dm.set(0, 1, 42.0);
        assert_eq!(dm.get(0, 1), 42.0);
        assert_eq!(dm.get(1, 0), 0.0);
    }

    #[test]
    fn test_nearest_neighbor_fast_matches_real() {
        let nodes = sample_nodes();
        let fm = DistanceMatrix::from_nodes(&nodes, fast);
        let rm = DistanceMatrix::from_nodes(&nodes, real);
        assert_eq!(fm.nearest_neighbor(0, &[1, 2]), Some(1));
        assert_eq!(rm.nearest_neighbor(0, &[1, 2]), Some(1));
        assert_eq!(fm.nearest_neighbor(0, &[2]), Some(2));
        assert_eq!(fm.nearest_neighbor(0, &[]), None);
    }

    #[test]
    fn test_closed_path_cost() {
        let nodes = vec![
            Node::depot(0.0, 0.0),
            Node::new(1.0, 0.0, 1),
            Node::new(2.0, 0.0, 1),
            Node::new(3.0, 0.0, 1),
        ];
        let rm = DistanceMatrix::from_nodes(&nodes, real);
        let em = DistanceMatrix::from_nodes(&nodes, exact);
        assert!((rm.closed_path_cost(0, &[1, 2, 3]) - 6.0).abs() < 1e-6);
        assert!((em.closed_path_cost(0, &[3, 1, 2]) - 8.0).abs() < 1e-12);
        assert_eq!(rm.closed_path_cost(0, &[]), 0.0);
        assert!((rm.closed_path_cost(0, &[2]) - 4.0).abs() < 1e-6);
    }
}
