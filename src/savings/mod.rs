//! Savings candidates and the pheromone trail table built over them.
//!
//! - [`make_savings`] — all feasible merge candidates, sorted by gain
//! - [`TrailTable`] — savings plus per-pair pheromone, updated between iterations
//! - [`TakenEdges`] — edge mask of the best route, drives reinforcement

mod saving;
mod trail;

pub use saving::{make_savings, Saving};
pub use trail::{TakenEdges, Trail, TrailTable, INITIAL_PHEROMONE};
