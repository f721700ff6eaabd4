//! Baseline searches without pheromone learning.
//!
//! Both work on a giant tour (every demand point once, no depot) that is
//! cut into vehicle paths by [`split_by_capacity`]. They give reference
//! costs the colony search should beat.
//!
//! - [`random_restart`] — Best of many shuffled giant tours
//! - [`tour_descent`] — Relocate and reverse descent on one giant tour

mod descent;
mod restart;
mod split;

pub use descent::tour_descent;
pub use restart::{random_restart, shuffled_tour};
pub use split::split_by_capacity;
