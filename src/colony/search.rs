//! Savings-based ant colony search loop.
//!
//! # Algorithm
//!
//! Each iteration fans `population` agents out over a worker pool. Every
//! agent builds a path set with the savings walk, refines it with local
//! search, and offers the resulting route to the shared best-route slot.
//! Once all agents are done, the edges of the best route become the
//! "taken" set and every trail decays toward it:
//!
//! ```text
//! pheromone = max(persistence * pheromone + (1 - persistence) * taken, min_pheromone)
//! ```
//!
//! Iterations without a strict improvement raise the stagnancy ratio; when
//! it reaches 1, or when nearly every trail sits at the floor, all
//! pheromones are reset to 1 while the best route is kept. The run stops at
//! an iteration boundary on cancellation, on the iteration cap, or when the
//! time budget runs out.
//!
//! # Reference
//!
//! Reimann, M., Doerner, K. & Hartl, R.F. (2004). "D-Ants: Savings Based
//! Ants divide and conquer the vehicle routing problem", *Computers &
//! Operations Research* 31(4), 563-591.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::constructive::{construct, WalkParams};
use crate::distance::DistanceCache;
use crate::error::{Error, Result};
use crate::local_search::improve_paths;
use crate::models::{Route, Spec};
use crate::savings::{make_savings, TakenEdges, TrailTable};

use super::{BestRoute, CancelToken, ColonyConfig, IterationStats, SearchOutcome, SearchState};

/// A configured colony bound to one problem instance.
///
/// # Examples
///
/// ```
/// use u_colony::models::{Node, Spec};
/// use u_colony::colony::{Colony, ColonyConfig, SearchState};
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
/// let config = ColonyConfig::default()
///     .with_population(4)
///     .with_max_iterations(5)
///     .with_threads(2);
///
/// let mut colony = Colony::new(spec, config).unwrap();
/// let observer = colony.observer();
/// let outcome = colony.run().unwrap();
///
/// assert_eq!(outcome.state, SearchState::Converged);
/// assert_eq!(outcome.iterations, 5);
/// assert_eq!(outcome.best.num_served(), 3);
/// assert_eq!(observer.cost(), Some(outcome.best.real_cost()));
/// ```
#[derive(Debug)]
pub struct Colony {
    spec: Spec,
    config: ColonyConfig,
    cache: DistanceCache,
    table: TrailTable,
    best: BestRoute,
    cancel: CancelToken,
}

impl Colony {
    /// Validates the configuration and precomputes distances and savings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for out-of-range parameters.
    pub fn new(spec: Spec, config: ColonyConfig) -> Result<Self> {
        config.validate()?;

        let cache = DistanceCache::new(&spec);
        let savings = make_savings(cache.real(), config.gain_threshold);
        log::debug!(
            "colony.init: n={} savings={} threshold={}",
            spec.dimension(),
            savings.len(),
            config.gain_threshold
        );

        Ok(Self {
            spec,
            config,
            cache,
            table: TrailTable::new(savings),
            best: BestRoute::new(),
            cancel: CancelToken::new(),
        })
    }

    pub fn spec(&self) -> &Spec {
        &self.spec
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    /// The trail table in its current pheromone state.
    pub fn trails(&self) -> &TrailTable {
        &self.table
    }

    /// A handle that reads the best route while [`Colony::run`] executes.
    pub fn observer(&self) -> BestRoute {
        self.best.clone()
    }

    /// A handle that stops [`Colony::run`] at the next iteration boundary.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Runs iterations until cancellation, the iteration cap, or the time
    /// budget. At least one iteration always completes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the worker pool cannot be built,
    /// and propagates construction failures ([`Error::Construction`],
    /// [`Error::Infeasible`]) from any agent.
    pub fn run(&mut self) -> Result<SearchOutcome> {
        let start = Instant::now();
        let threads = self
            .config
            .threads
            .unwrap_or_else(rayon::current_num_threads)
            .max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::invalid_config(format!("worker pool ({threads} threads): {e}")))?;

        let seed = self.spec.seed();
        let rngs: Vec<Mutex<SmallRng>> = (0..threads)
            .map(|i| Mutex::new(SmallRng::seed_from_u64(seed.wrapping_add(i as u64))))
            .collect();

        let params = WalkParams {
            alpha: self.config.alpha,
            beta: self.config.beta,
            window: WalkParams::window_for(
                self.spec.dimension(),
                self.config.neighbourhood_divisor,
            ),
        };

        log::info!(
            "colony: start n={} savings={} population={} threads={threads} window={} budget_s={:.1}",
            self.spec.dimension(),
            self.table.len(),
            self.config.population,
            params.window,
            self.config.time_budget.as_secs_f64()
        );
        self.best.set_state(SearchState::Iterating);

        let mut history = Vec::new();
        let mut stagnant = 0usize;
        let mut resets = 0usize;
        let mut iteration = 0usize;

        let state = loop {
            let previous = self.best.cost();
            let costs = pool.install(|| {
                (0..self.config.population)
                    .into_par_iter()
                    .map(|_| self.run_agent(&params, &rngs))
                    .collect::<Result<Vec<f32>>>()
            });
            let costs = match costs {
                Ok(costs) => costs,
                Err(e) => {
                    log::error!("colony: agent failed at iter={iteration}: {e}");
                    return Err(e);
                }
            };

            let iteration_best = costs.iter().copied().fold(f32::INFINITY, f32::min);
            let best = self
                .best
                .snapshot()
                .ok_or_else(|| Error::construction("no route after a full iteration"))?;

            let improved = previous.is_none_or(|p| best.real_cost() < p);
            if improved {
                stagnant = 0;
                log::info!(
                    "colony: new best iter={iteration} cost={:.3} vehicles={}",
                    best.exact_cost(),
                    best.num_paths()
                );
            } else {
                stagnant += 1;
            }

            let taken = TakenEdges::from_route(self.spec.dimension(), &best);
            let stagnancy = stagnant as f32 / self.config.max_stagnancy as f32;
            let (floor_ratio, reset, workers) =
                pool.install(|| self.reinforce(&taken, stagnancy));
            if reset {
                log::debug!(
                    "colony.reset: iter={iteration} stagnancy={stagnancy:.2} floor_ratio={floor_ratio:.2}"
                );
                stagnant = 0;
                resets += 1;
            }

            history.push(IterationStats {
                iteration,
                iteration_best,
                best: best.real_cost(),
                stagnancy,
                reset,
                workers,
                elapsed: start.elapsed(),
            });

            if self.config.log_every > 0 && iteration % self.config.log_every == 0 {
                log::debug!(
                    "colony.iter: i={iteration} iter_best={iteration_best:.3} best={:.3} stagnancy={stagnancy:.2}",
                    best.real_cost()
                );
            }

            iteration += 1;
            if let Some(state) = self.stop_reason(iteration, start.elapsed()) {
                break state;
            }
        };

        self.best.set_state(state);
        let best = self
            .best
            .snapshot()
            .ok_or_else(|| Error::construction("search finished without a route"))?;
        let elapsed = start.elapsed();

        log::info!(
            "colony: done state={state:?} iterations={iteration} resets={resets} cost={:.3} elapsed_s={:.2}",
            best.exact_cost(),
            elapsed.as_secs_f64()
        );

        Ok(SearchOutcome {
            state,
            best,
            iterations: iteration,
            resets,
            history,
            elapsed,
        })
    }

    /// One agent: construct, refine, score, and offer to the best slot.
    fn run_agent(&self, params: &WalkParams, rngs: &[Mutex<SmallRng>]) -> Result<f32> {
        let slot = rayon::current_thread_index().unwrap_or(0) % rngs.len();
        let built = {
            let mut rng = rngs[slot].lock().unwrap_or_else(PoisonError::into_inner);
            construct(&self.spec, self.cache.real(), &self.table, params, &mut *rng)?
        };

        let mut paths = built.paths;
        improve_paths(&mut paths, &self.spec, &self.cache, self.config.kruskal);

        let route = Route::new(paths, &self.cache);
        let cost = route.real_cost();
        self.best.offer(Arc::new(route));
        Ok(cost)
    }

    /// Decays trails toward `taken`, then resets them if the run stagnated
    /// or the floor is saturated. Returns the floor ratio before any reset,
    /// whether a reset happened, and the worker count it ran with.
    fn reinforce(&mut self, taken: &TakenEdges, stagnancy: f32) -> (f32, bool, usize) {
        let min = self.config.min_pheromone;
        self.table.update(taken, self.config.persistence, min);
        let floor_ratio = self.table.floor_ratio(min);
        let reset = stagnancy >= 1.0
            || (!self.table.is_empty() && floor_ratio >= self.config.saturation_ratio);
        if reset {
            self.table.reset();
        }
        (floor_ratio, reset, rayon::current_num_threads())
    }

    fn stop_reason(&self, iterations: usize, elapsed: Duration) -> Option<SearchState> {
        if self.cancel.is_cancelled() {
            Some(SearchState::Cancelled)
        } else if self.config.max_iterations.is_some_and(|cap| iterations >= cap) {
            Some(SearchState::Converged)
        } else if elapsed >= self.config.time_budget {
            Some(SearchState::TimeExpired)
        } else {
            None
        }
    }
}

/// Builds a colony and runs it to completion.
///
/// # Errors
///
/// See [`Colony::new`] and [`Colony::run`].
pub fn solve(spec: Spec, config: ColonyConfig) -> Result<SearchOutcome> {
    Colony::new(spec, config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation;
    use crate::models::Node;

    fn grid_spec() -> Spec {
        let mut nodes = vec![Node::depot(50.0, 50.0)];
        for i in 0..5 {
            for j in 0..5 {
                if i == 2 && j == 2 {
                    continue;
                }
                nodes.push(Node::new(i as f64 * 25.0, j as f64 * 25.0, 1 + ((i + j) % 3)));
            }
        }
        Spec::new(nodes, 12).expect("valid")
    }

    fn quick() -> ColonyConfig {
        ColonyConfig::default()
            .with_population(8)
            .with_threads(2)
            .with_max_iterations(15)
            .with_time_budget(Duration::from_secs(30))
    }

    #[test]
    fn test_run_respects_iteration_cap() {
        let mut colony = Colony::new(grid_spec(), quick()).expect("valid");
        let outcome = colony.run().expect("run");
        assert_eq!(outcome.state, SearchState::Converged);
        assert_eq!(outcome.iterations, 15);
        assert_eq!(outcome.history.len(), 15);
        assert!(evaluation::validate(colony.spec(), outcome.best.paths()).is_empty());
    }

    #[test]
    fn test_best_cost_never_increases() {
        let mut colony = Colony::new(grid_spec(), quick()).expect("valid");
        let outcome = colony.run().expect("run");
        for w in outcome.history.windows(2) {
            assert!(w[1].best <= w[0].best);
        }
        for row in &outcome.history {
            assert!(row.best <= row.iteration_best);
        }
        let last = outcome.history.last().expect("history");
        assert_eq!(last.best, outcome.best.real_cost());
    }

    #[test]
    fn test_stagnation_triggers_reset() {
        // A single reachable structure never improves after iteration 0.
        let spec = Spec::new(
            vec![
                Node::depot(0.0, 0.0),
                Node::new(1.0, 0.0, 3),
                Node::new(0.0, 1.0, 3),
                Node::new(-1.0, 0.0, 3),
            ],
            3,
        )
        .expect("valid");
        let config = quick().with_max_stagnancy(3).with_max_iterations(10);
        let outcome = solve(spec, config).expect("run");
        assert!(outcome.resets >= 2);
        assert!(outcome.history.iter().any(|r| r.reset));
        assert_eq!(outcome.best.num_paths(), 3);
    }

    #[test]
    fn test_pheromones_stay_bounded() {
        let config = quick().with_min_pheromone(0.1).with_persistence(0.5);
        let mut colony = Colony::new(grid_spec(), config).expect("valid");
        colony.run().expect("run");
        for t in colony.trails().trails() {
            assert!(t.pheromone >= 0.1 - 1e-6);
            assert!(t.pheromone <= 1.0);
        }
    }

    #[test]
    fn test_cancel_before_run_stops_after_one_iteration() {
        let mut colony =
            Colony::new(grid_spec(), quick().with_max_iterations(1000)).expect("valid");
        colony.cancel_token().cancel();
        let outcome = colony.run().expect("run");
        assert_eq!(outcome.state, SearchState::Cancelled);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(colony.observer().state(), SearchState::Cancelled);
    }

    #[test]
    fn test_time_budget_stops_run() {
        let config = ColonyConfig::default()
            .with_population(4)
            .with_threads(1)
            .with_time_budget(Duration::from_millis(50));
        let outcome = solve(grid_spec(), config).expect("run");
        assert_eq!(outcome.state, SearchState::TimeExpired);
        assert!(outcome.iterations >= 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = Colony::new(grid_spec(), quick().with_population(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_floor_saturation_triggers_reset() {
        let config = quick()
            .with_persistence(0.1)
            .with_min_pheromone(0.05)
            .with_max_stagnancy(1000)
            .with_saturation_ratio(0.5)
            .with_max_iterations(6);
        let outcome = solve(grid_spec(), config).expect("run");
        assert!(outcome.resets >= 1);
        assert!(outcome.history.iter().any(|r| r.reset));
        assert!(outcome.history.iter().all(|r| r.stagnancy < 1.0));
    }

    #[test]
    fn test_pheromone_update_runs_on_configured_pool() {
        for threads in [1, 3] {
            let config = quick().with_threads(threads).with_max_iterations(3);
            let outcome = solve(grid_spec(), config).expect("run");
            assert!(outcome.history.iter().all(|r| r.workers == threads));
        }
    }
}
