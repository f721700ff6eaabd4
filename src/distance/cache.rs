//! Per-run bundle of the three score matrices.

use crate::models::Spec;

use super::{exact, fast, real, DistanceMatrix, ScoreMode};

/// Precomputed exact, real, and fast score matrices for one instance.
///
/// Immutable after construction and shared read-only by all agents.
#[derive(Debug, Clone)]
pub struct DistanceCache {
    exact: DistanceMatrix<f64>,
    real: DistanceMatrix<f32>,
    fast: DistanceMatrix<f32>,
}

impl DistanceCache {
    /// Builds all three matrices from the instance's nodes.
    pub fn new(spec: &Spec) -> Self {
        let nodes = spec.nodes();
        Self {
            exact: DistanceMatrix::from_nodes(nodes, exact),
            real: DistanceMatrix::from_nodes(nodes, real),
            fast: DistanceMatrix::from_nodes(nodes, fast),
        }
    }

    /// Double-precision distances, for reported costs.
    pub fn exact(&self) -> &DistanceMatrix<f64> {
        &self.exact
    }

    /// Single-precision distances, the additive search cost.
    pub fn real(&self) -> &DistanceMatrix<f32> {
        &self.real
    }

    /// Squared distances, for proximity comparisons only.
    pub fn fast(&self) -> &DistanceMatrix<f32> {
        &self.fast
    }

    /// Score between `a` and `b` under `mode`, widened to `f64`.
    #[inline]
    pub fn score(&self, mode: ScoreMode, a: usize, b: usize) -> f64 {
        match mode {
            ScoreMode::Exact => self.exact.get(a, b),
            ScoreMode::Real => f64::from(self.real.get(a, b)),
            ScoreMode::Fast => f64::from(self.fast.get(a, b)),
        }
    }

    /// Number of nodes covered.
    pub fn dimension(&self) -> usize {
        self.real.size()
    }
}
