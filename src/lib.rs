//! # u-colony
//!
//! Savings-based ant colony search for the capacitated vehicle routing
//! problem (single depot, homogeneous fleet).
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Node, Spec, Path, Route)
//! - [`distance`] — Exact, real, and fast score matrices
//! - [`savings`] — Savings list and pheromone trail table
//! - [`constructive`] — Probabilistic savings construction over a chain-merge arena
//! - [`local_search`] — 2-opt, single-node exchange, doubled-MST rebuild
//! - [`evaluation`] — Route feasibility validation
//! - [`colony`] — Parallel iterate-evaluate-reinforce search loop
//! - [`baseline`] — Random-restart and giant-tour descent reference searches
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use u_colony::colony::{solve, ColonyConfig};
//! use u_colony::models::{Node, Spec};
//!
//! let spec = Spec::new(
//!     vec![
//!         Node::depot(0.0, 0.0),
//!         Node::new(3.0, 4.0, 2),
//!         Node::new(4.0, 3.0, 2),
//!         Node::new(-3.0, 4.0, 2),
//!         Node::new(-4.0, -3.0, 2),
//!     ],
//!     4,
//! )
//! .unwrap();
//! let config = ColonyConfig::default()
//!     .with_population(10)
//!     .with_max_iterations(20)
//!     .with_time_budget(Duration::from_secs(5));
//!
//! let outcome = solve(spec, config).unwrap();
//! assert_eq!(outcome.best.num_served(), 4);
//! assert!(outcome.best.paths().iter().all(|p| p.load() <= 4));
//! println!("{}cost {:.2}", outcome.best, outcome.best.exact_cost());
//! ```

pub mod baseline;
pub mod colony;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod savings;

pub use error::{Error, Result};
