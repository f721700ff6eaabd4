//! Domain model types for the capacitated vehicle routing problem.
//!
//! Provides demand points, the immutable problem instance, single-vehicle
//! paths, and complete routes.

mod node;
mod path;
mod route;
mod spec;

pub use node::Node;
pub use path::{Path, DEPOT};
pub use route::{edge_key, Route};
pub use spec::{Spec, DEFAULT_SEED, MAX_COORDINATE};
