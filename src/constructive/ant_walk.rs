//! Savings-based ant construction.
//!
//! # Algorithm
//!
//! Starting from one chain per demand point, repeatedly:
//!
//! 1. Take the `window` highest-gain candidates still in the pool.
//! 2. Weight each as `gain^alpha * pheromone^beta` and pick one by
//!    roulette wheel.
//! 3. Link its two endpoints, merging their chains.
//! 4. Drop every candidate that became infeasible: the chosen pair, pairs
//!    touching a node that is now interior, pairs whose merged load would
//!    exceed capacity, and pairs joining the two ends of one chain.
//!
//! When the pool is empty, every chain is emitted as a depot-rooted path.
//!
//! # Reference
//!
//! Reimann, M., Stummer, M. & Doerner, K. (2002). "A Savings Based Ant
//! System for the Vehicle Routing Problem", *GECCO 2002*, 1317-1326.

use rand::Rng;

use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::evaluation;
use crate::models::{Path, Spec};
use crate::savings::TrailTable;

use super::WayPoints;

/// Tunables for one construction pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParams {
    /// Exponent applied to the saving gain.
    pub alpha: f32,
    /// Exponent applied to the pheromone level.
    pub beta: f32,
    /// Number of top candidates considered per selection.
    pub window: usize,
}

impl WalkParams {
    /// Window size `max(1, dimension / divisor)`.
    pub fn window_for(dimension: usize, divisor: usize) -> usize {
        (dimension / divisor.max(1)).max(1)
    }
}

/// Outcome of one construction pass.
#[derive(Debug, Clone)]
pub struct Construction {
    /// Depot-rooted paths covering every demand point once.
    pub paths: Vec<Path>,
    /// Merges applied.
    pub merges: usize,
    /// Candidates drawn but refused at validation.
    pub rejected: usize,
    /// Star cost (every point served alone) minus applied gains.
    pub estimated_cost: f32,
}

/// Builds a capacity-feasible path set from the trail table.
///
/// # Errors
///
/// Returns [`Error::Construction`] if the chain bookkeeping becomes
/// inconsistent, and [`Error::Infeasible`] if the drained paths fail
/// validation. Neither happens for a correct filter.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_colony::models::{Node, Spec};
/// use u_colony::distance::{real, DistanceMatrix};
/// use u_colony::savings::{make_savings, TrailTable};
/// use u_colony::constructive::{construct, WalkParams};
///
/// let spec = Spec::new(
///     vec![
///         Node::depot(0.0, 0.0),
///         Node::new(10.0, 0.0, 1),
///         Node::new(10.0, 1.0, 1),
///         Node::new(-10.0, 0.0, 1),
///     ],
///     2,
/// )
/// .unwrap();
/// let dm = DistanceMatrix::from_nodes(spec.nodes(), real);
/// let table = TrailTable::new(make_savings(&dm, 1e-3));
/// let params = WalkParams { alpha: 1.0, beta: 1.0, window: 2 };
/// let mut rng = SmallRng::seed_from_u64(1);
///
/// let built = construct(&spec, &dm, &table, &params, &mut rng).unwrap();
/// assert_eq!(built.paths.iter().map(|p| p.len()).sum::<usize>(), 3);
/// assert!(built.paths.iter().all(|p| p.load() <= 2));
/// ```
pub fn construct<R: Rng + ?Sized>(
    spec: &Spec,
    real: &DistanceMatrix<f32>,
    table: &TrailTable,
    params: &WalkParams,
    rng: &mut R,
) -> Result<Construction> {
    let num_customers = spec.num_customers();
    let mut waypoints = WayPoints::new(spec);
    let mut pool: Vec<usize> = (0..table.len())
        .filter(|&idx| {
            let s = table.get(idx).saving;
            waypoints.is_feasible(s.n1, s.n2)
        })
        .collect();
    let mut cumulative: Vec<f64> = Vec::with_capacity(params.window);

    let mut estimated_cost: f32 = (1..spec.dimension()).map(|i| real.get(i, 0) * 2.0).sum();
    let mut merges = 0usize;
    let mut rejected = 0usize;

    while !pool.is_empty() {
        let size = params.window.max(1).min(pool.len());

        cumulative.clear();
        let mut total = 0.0f64;
        for &idx in &pool[..size] {
            total += table.get(idx).weight(params.alpha, params.beta);
            cumulative.push(total);
        }

        let chosen = if total > 0.0 && total.is_finite() {
            let dice = rng.random::<f64>() * total;
            cumulative
                .iter()
                .position(|&c| c >= dice)
                .unwrap_or(size - 1)
        } else {
            rng.random_range(0..size)
        };

        let chosen_idx = pool[chosen];
        let saving = table.get(chosen_idx).saving;

        if let Err(rejection) = waypoints.check_merge(saving.n1, saving.n2) {
            log::trace!(
                "construct: reject {}~{} ({rejection:?}), retrying",
                saving.n1,
                saving.n2
            );
            pool.remove(chosen);
            rejected += 1;
            continue;
        }

        waypoints.merge(saving.n1, saving.n2)?;
        merges += 1;
        estimated_cost -= saving.gain;

        if merges >= num_customers {
            return Err(Error::construction(format!(
                "{merges} merges for {num_customers} demand points"
            )));
        }

        pool.retain(|&idx| {
            if idx == chosen_idx {
                return false;
            }
            let s = table.get(idx).saving;
            waypoints.is_feasible(s.n1, s.n2)
        });
    }

    let paths: Vec<Path> = waypoints
        .into_chains()?
        .into_iter()
        .map(|chain| Path::new(chain, spec, real))
        .collect();
    evaluation::check(spec, &paths)?;

    Ok(Construction {
        paths,
        merges,
        rejected,
        estimated_cost,
    })
}
