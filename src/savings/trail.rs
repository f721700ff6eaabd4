//! Pheromone trails over savings.

use rayon::prelude::*;

use crate::models::{edge_key, Route};

use super::Saving;

/// Initial and reset pheromone level; also the upper bound.
pub const INITIAL_PHEROMONE: f32 = 1.0;

/// A saving plus the pheromone deposited on its edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trail {
    /// The underlying merge candidate.
    pub saving: Saving,
    /// Current pheromone level, within `[min_pheromone, 1.0]`.
    pub pheromone: f32,
}

impl Trail {
    /// Roulette weight `gain^alpha * pheromone^beta`.
    #[inline]
    pub fn weight(&self, alpha: f32, beta: f32) -> f64 {
        f64::from(self.saving.gain).powf(f64::from(alpha))
            * f64::from(self.pheromone).powf(f64::from(beta))
    }
}

/// The run-wide table of trails, sorted by decreasing gain.
///
/// Agents read it concurrently during construction; pheromones are only
/// written between iterations, through `&mut self`.
///
/// # Examples
///
/// ```
/// use u_colony::savings::{Saving, TrailTable};
///
/// let mut table = TrailTable::new(vec![
///     Saving { n1: 1, n2: 2, gain: 5.0 },
///     Saving { n1: 2, n2: 3, gain: 4.0 },
/// ]);
/// assert_eq!(table.len(), 2);
/// assert!(table.trails().iter().all(|t| t.pheromone == 1.0));
///
/// table.reset();
/// assert_eq!(table.floor_ratio(0.05), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct TrailTable {
    trails: Vec<Trail>,
}

impl TrailTable {
    /// Wraps each saving as a trail at the initial pheromone level.
    pub fn new(savings: Vec<Saving>) -> Self {
        let trails = savings
            .into_iter()
            .map(|saving| Trail {
                saving,
                pheromone: INITIAL_PHEROMONE,
            })
            .collect();
        Self { trails }
    }

    /// All trails in decreasing-gain order.
    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    /// Trail at position `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> &Trail {
        &self.trails[idx]
    }

    pub fn len(&self) -> usize {
        self.trails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }

    /// Decays every trail toward the taken-edge indicator:
    ///
    /// ```text
    /// pheromone = max(persistence * pheromone + (1 - persistence) * taken, min_pheromone)
    /// ```
    ///
    /// Each trail is written by exactly one worker.
    pub fn update(&mut self, taken: &TakenEdges, persistence: f32, min_pheromone: f32) {
        self.trails.par_iter_mut().for_each(|trail| {
            let t = if taken.contains(trail.saving.n1, trail.saving.n2) {
                1.0
            } else {
                0.0
            };
            let p = persistence * trail.pheromone + (1.0 - persistence) * t;
            trail.pheromone = p.max(min_pheromone).min(INITIAL_PHEROMONE);
        });
    }

    /// Restores every trail to the initial level.
    pub fn reset(&mut self) {
        self.trails
            .par_iter_mut()
            .for_each(|trail| trail.pheromone = INITIAL_PHEROMONE);
    }

    /// Fraction of trails sitting at (or numerically at) the floor.
    ///
    /// Returns 0.0 for an empty table.
    pub fn floor_ratio(&self, min_pheromone: f32) -> f32 {
        if self.trails.is_empty() {
            return 0.0;
        }
        let eps = min_pheromone.abs().max(1.0) * 1e-4;
        let at_floor = self
            .trails
            .par_iter()
            .filter(|t| t.pheromone <= min_pheromone + eps)
            .count();
        at_floor as f32 / self.trails.len() as f32
    }
}

/// Dense membership mask of the edges used by a route.
#[derive(Debug, Clone)]
pub struct TakenEdges {
    mask: Vec<bool>,
    dim: usize,
}

impl TakenEdges {
    /// An empty mask for `dim` nodes.
    pub fn new(dim: usize) -> Self {
        Self {
            mask: vec![false; dim * dim],
            dim,
        }
    }

    /// Marks every edge of `route`.
    pub fn from_route(dim: usize, route: &Route) -> Self {
        let mut taken = Self::new(dim);
        for &(a, b) in route.edges() {
            taken.insert(a, b);
        }
        taken
    }

    pub fn insert(&mut self, a: usize, b: usize) {
        let (a, b) = edge_key(a, b);
        self.mask[a * self.dim + b] = true;
    }

    #[inline]
    pub fn contains(&self, a: usize, b: usize) -> bool {
        let (a, b) = edge_key(a, b);
        self.mask[a * self.dim + b]
    }
}
