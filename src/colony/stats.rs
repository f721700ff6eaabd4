//! Search lifecycle and telemetry types.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::models::Route;

/// Lifecycle of a colony search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchState {
    /// Distances and savings are being prepared.
    Initializing,
    /// Iterations are running.
    Iterating,
    /// The iteration cap was reached.
    Converged,
    /// The wall-clock budget ran out.
    TimeExpired,
    /// A [`CancelToken`](super::CancelToken) stopped the run.
    Cancelled,
}

impl SearchState {
    /// `true` once the search has stopped.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Converged | Self::TimeExpired | Self::Cancelled)
    }
}

/// One telemetry row per iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationStats {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Cheapest agent route of this iteration (real score).
    pub iteration_best: f32,
    /// Run-best cost after this iteration (real score).
    pub best: f32,
    /// Stagnant iterations divided by the configured maximum.
    pub stagnancy: f32,
    /// Whether pheromones were reset at the end of this iteration.
    pub reset: bool,
    /// Worker threads available to the pheromone update.
    pub workers: usize,
    /// Wall-clock time since the run started.
    pub elapsed: Duration,
}

/// Result of a finished colony search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Why the search stopped.
    pub state: SearchState,
    /// Best route found.
    pub best: Arc<Route>,
    /// Iterations completed.
    pub iterations: usize,
    /// Pheromone resets performed.
    pub resets: usize,
    /// Per-iteration telemetry.
    pub history: Vec<IterationStats>,
    /// Total wall-clock time.
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_finished() {
        assert!(!SearchState::Initializing.is_finished());
        assert!(!SearchState::Iterating.is_finished());
        assert!(SearchState::Converged.is_finished());
        assert!(SearchState::TimeExpired.is_finished());
        assert!(SearchState::Cancelled.is_finished());
    }
}
