//! Colony search: configuration, the iterate-evaluate-reinforce loop, and
//! the handles through which callers observe or stop it.
//!
//! - [`ColonyConfig`] — tuning parameters with validation
//! - [`Colony`] / [`solve`] — the parallel search loop
//! - [`BestRoute`] — shared best-route slot readable at any time
//! - [`CancelToken`] — cooperative stop request
//! - [`SearchOutcome`], [`IterationStats`] — results and telemetry

mod config;
mod search;
mod shared;
mod stats;

pub use config::ColonyConfig;
pub use search::{solve, Colony};
pub use shared::{BestRoute, CancelToken};
pub use stats::{IterationStats, SearchOutcome, SearchState};
