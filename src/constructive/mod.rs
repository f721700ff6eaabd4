//! Probabilistic savings construction.
//!
//! - [`WayPoints`] — O(1) chain-merge arena indexed by node id
//! - [`construct`] — roulette-wheel savings walk biased by pheromone

mod ant_walk;
mod waypoint;

pub use ant_walk::{construct, Construction, WalkParams};
pub use waypoint::{MergeRejection, WayPoint, WayPoints};
