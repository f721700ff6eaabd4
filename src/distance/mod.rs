//! Pairwise distance scores and dense score matrices.
//!
//! - [`exact`], [`real`], [`fast`] — scoring functions: exact (`f64`), real (`f32`), fast (`f32`, squared)
//! - [`DistanceMatrix`] — dense n×n matrix for one scoring function
//! - [`DistanceCache`] — the three matrices bundled for a run

mod cache;
mod matrix;
mod score;

pub use cache::DistanceCache;
pub use matrix::DistanceMatrix;
pub use score::{exact, fast, real, ScoreMode};
