//! Random-restart baseline.
//!
//! # Algorithm
//!
//! Every sample shuffles the demand points into a giant tour (Fisher-Yates)
//! and cuts it with [`split_by_capacity`]. Samples run in parallel on a
//! dedicated worker pool. Sample `i` draws from a generator seeded with
//! `spec.seed() + i`, so the result does not depend on the thread count.
//! The cheapest route wins and ties go to the lowest sample index.
//!
//! # Complexity
//!
//! O(samples × n) work for n demand points.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::distance::DistanceCache;
use crate::error::{Error, Result};
use crate::evaluation;
use crate::models::{Route, Spec};

use super::split_by_capacity;

/// The demand points `1..dimension` in uniformly random order.
pub fn shuffled_tour<R: Rng + ?Sized>(dimension: usize, rng: &mut R) -> Vec<usize> {
    let mut tour: Vec<usize> = (1..dimension).collect();
    for i in (1..tour.len()).rev() {
        let j = rng.random_range(0..=i);
        tour.swap(i, j);
    }
    tour
}

/// Keeps the cheapest of `samples` random giant tours split by capacity.
///
/// `threads` sizes the worker pool (all cores when `None`).
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] when `samples` is zero or the pool
/// cannot be built, and [`Error::Infeasible`] if the winning route fails
/// validation.
///
/// # Examples
///
/// ```
/// use u_colony::baseline::random_restart;
/// use u_colony::distance::DistanceCache;
/// use u_colony::models::{Node, Spec};
///
/// let spec = Spec::new(
///     vec![
///         Node::depot(0.0, 0.0),
///         Node::new(4.0, 0.0, 2),
///         Node::new(0.0, 4.0, 2),
///         Node::new(-4.0, 0.0, 2),
///     ],
///     4,
/// )
/// .unwrap();
/// let cache = DistanceCache::new(&spec);
/// let route = random_restart(&spec, &cache, 50, Some(2)).unwrap();
/// assert_eq!(route.num_served(), 3);
/// assert!(route.paths().iter().all(|p| p.load() <= 4));
/// ```
pub fn random_restart(
    spec: &Spec,
    cache: &DistanceCache,
    samples: usize,
    threads: Option<usize>,
) -> Result<Route> {
    if samples == 0 {
        return Err(Error::invalid_config("samples must be positive"));
    }
    let threads = threads.unwrap_or_else(rayon::current_num_threads).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| Error::invalid_config(format!("worker pool ({threads} threads): {e}")))?;

    let seed = spec.seed();
    let best = pool.install(|| {
        (0..samples)
            .into_par_iter()
            .map(|i| (i, sample(spec, cache, seed.wrapping_add(i as u64))))
            .reduce_with(|a, b| {
                let (ca, cb) = (a.1.real_cost(), b.1.real_cost());
                if cb < ca || (cb == ca && b.0 < a.0) {
                    b
                } else {
                    a
                }
            })
    });
    let (index, route) = best.ok_or_else(|| Error::construction("no sample completed"))?;
    evaluation::check(spec, route.paths())?;

    log::info!(
        "baseline.restart: samples={samples} threads={threads} best_sample={index} cost={:.3} vehicles={}",
        route.exact_cost(),
        route.num_paths()
    );
    Ok(route)
}

fn sample(spec: &Spec, cache: &DistanceCache, seed: u64) -> Route {
    let mut rng = SmallRng::seed_from_u64(seed);
    let tour = shuffled_tour(spec.dimension(), &mut rng);
    Route::new(split_by_capacity(&tour, spec, cache.real()), cache)
}
