//! State shared between the search loop and outside observers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::Route;

use super::SearchState;

#[derive(Debug)]
struct Slot {
    route: Option<Arc<Route>>,
    state: SearchState,
}

/// Handle to the best route found so far.
///
/// Cloning the handle shares the slot, so an observer thread can read a
/// consistent snapshot while the search is running. The slot only ever holds
/// fully-built routes; replacement is a compare-and-swap on the real cost
/// under one lock.
#[derive(Debug, Clone)]
pub struct BestRoute {
    slot: Arc<Mutex<Slot>>,
}

impl Default for BestRoute {
    fn default() -> Self {
        Self::new()
    }
}

impl BestRoute {
    /// An empty slot in the [`SearchState::Initializing`] state.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                route: None,
                state: SearchState::Initializing,
            })),
        }
    }

    // The slot is only written whole, so a poisoned lock still guards a
    // committed value.
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current best route, if any iteration has finished an agent.
    pub fn snapshot(&self) -> Option<Arc<Route>> {
        self.lock().route.clone()
    }

    /// Real-score cost of the current best route.
    pub fn cost(&self) -> Option<f32> {
        self.lock().route.as_ref().map(|r| r.real_cost())
    }

    /// Lifecycle state of the search feeding this slot.
    pub fn state(&self) -> SearchState {
        self.lock().state
    }

    pub(crate) fn set_state(&self, state: SearchState) {
        self.lock().state = state;
    }

    /// Installs `route` if it is strictly cheaper than the incumbent.
    ///
    /// Returns `true` if the route was installed. Ties keep the incumbent.
    pub fn offer(&self, route: Arc<Route>) -> bool {
        let mut slot = self.lock();
        let better = slot
            .route
            .as_ref()
            .is_none_or(|best| route.real_cost() < best.real_cost());
        if better {
            slot.route = Some(route);
        }
        better
    }
}

/// Cooperative stop request, observed by the search at iteration
/// boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the search to stop after the current iteration.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceCache;
    use crate::models::{Node, Path, Spec};

    fn routes() -> (Route, Route) {
        let spec = Spec::new(
            vec![
                Node::depot(0.0, 0.0),
                Node::new(1.0, 0.0, 1),
                Node::new(2.0, 0.0, 1),
            ],
            2,
        )
        .expect("valid");
        let cache = DistanceCache::new(&spec);
        let merged = Route::new(vec![Path::new(vec![1, 2], &spec, cache.real())], &cache);
        let split = Route::new(
            vec![
                Path::new(vec![1], &spec, cache.real()),
                Path::new(vec![2], &spec, cache.real()),
            ],
            &cache,
        );
        (merged, split)
    }

    #[test]
    fn test_offer_keeps_strictly_better() {
        let (merged, split) = routes();
        let best = BestRoute::new();
        assert!(best.snapshot().is_none());

        assert!(best.offer(Arc::new(split.clone())));
        assert!((best.cost().expect("set") - 6.0).abs() < 1e-6);

        assert!(best.offer(Arc::new(merged.clone())));
        assert!(!best.offer(Arc::new(split)));
        assert!(!best.offer(Arc::new(merged)));
        assert!((best.cost().expect("set") - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_observer_shares_slot() {
        let (merged, _) = routes();
        let best = BestRoute::new();
        let observer = best.clone();
        best.offer(Arc::new(merged));
        best.set_state(SearchState::Iterating);
        assert_eq!(observer.snapshot().expect("set").num_paths(), 1);
        assert_eq!(observer.state(), SearchState::Iterating);
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
    }
}
