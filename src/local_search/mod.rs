//! Local search operators for refining constructed path sets.
//!
//! - [`two_opt`] — Intra-path 2-opt segment reversal
//! - [`one_exchange`] — Inter-path single-node swap
//! - [`kruskal_rebuild`] — Doubled-MST path reconstruction
//!
//! All operators use the single-precision real score and treat "no
//! improvement" as a normal fixed point.

mod kruskal;
mod one_exchange;
mod two_opt;

pub use kruskal::kruskal_rebuild;
pub use one_exchange::one_exchange;
pub use two_opt::two_opt;

use crate::distance::DistanceCache;
use crate::models::{Path, Spec};

/// Minimum relative cost decrease for a move to count as an improvement.
pub(crate) const EPS: f32 = 1e-4;

/// `true` if `delta` is a decrease larger than `EPS` times the cost of the
/// edges being replaced (at least 1). Keeps `f32` rounding on long edges
/// from passing as an improvement.
#[inline]
pub(crate) fn improves(delta: f32, replaced: f32) -> bool {
    delta < -EPS * replaced.max(1.0)
}

/// Runs the full refinement sequence on one agent's paths:
/// optional MST rebuild, 2-opt, single-node exchange, then 2-opt again on
/// the paths the exchange touched.
///
/// Never increases the summed real cost.
pub fn improve_paths(paths: &mut [Path], spec: &Spec, cache: &DistanceCache, kruskal: bool) {
    let real = cache.real();

    for path in paths.iter_mut() {
        if kruskal {
            kruskal_rebuild(path, real, cache.fast());
        }
        two_opt(path, real);
    }

    if one_exchange(paths, spec, real) {
        for path in paths.iter_mut() {
            two_opt(path, real);
        }
    }
}
