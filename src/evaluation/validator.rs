//! Path-set validator: coverage, capacity, and cached-load consistency.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Path, Spec, DEPOT};

/// A type of constraint violation in a path set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Path demand exceeds vehicle capacity.
    CapacityExceeded {
        /// Path index in the set.
        path_index: usize,
        /// Summed demand of the path.
        load: i64,
        /// Vehicle capacity.
        capacity: i32,
    },
    /// A demand point is not served by any path.
    NodeMissing {
        /// The unserved node.
        node: usize,
    },
    /// A demand point is served more than once.
    NodeRepeated {
        /// The repeated node.
        node: usize,
    },
    /// A node index outside the instance.
    NodeOutOfRange {
        /// The offending index.
        node: usize,
    },
    /// The depot appears inside a path.
    DepotInPath {
        /// Path index in the set.
        path_index: usize,
    },
    /// The cached path load disagrees with the summed demands.
    LoadMismatch {
        /// Path index in the set.
        path_index: usize,
        /// Load stored on the path.
        cached: i32,
        /// Load recomputed from demands.
        actual: i64,
    },
}

/// A constraint violation in a path set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// Checks that `paths` serve every demand point of `spec` exactly once and
/// that every path respects the capacity.
///
/// A feasible path set yields an empty list.
///
/// # Examples
///
/// ```
/// use u_colony::models::{Node, Path, Spec};
/// use u_colony::evaluation::{validate, ViolationType};
///
/// let spec = Spec::new(
///     vec![Node::depot(0.0, 0.0), Node::new(1.0, 0.0, 6), Node::new(2.0, 0.0, 6)],
///     10,
/// )
/// .unwrap();
/// let paths = vec![Path::from_parts(vec![1, 2], 12, 4.0)];
/// let violations = validate(&spec, &paths);
/// assert_eq!(violations.len(), 1);
/// assert!(matches!(violations[0].kind, ViolationType::CapacityExceeded { load: 12, .. }));
/// ```
pub fn validate(spec: &Spec, paths: &[Path]) -> Vec<Violation> {
    let dim = spec.dimension();
    let mut violations = Vec::new();
    let mut seen = vec![0u32; dim];

    for (path_index, path) in paths.iter().enumerate() {
        let mut load = 0i64;
        for &node in path.nodes() {
            if node >= dim {
                violations.push(Violation::new(ViolationType::NodeOutOfRange { node }));
                continue;
            }
            if node == DEPOT {
                violations.push(Violation::new(ViolationType::DepotInPath { path_index }));
                continue;
            }
            seen[node] += 1;
            load += i64::from(spec.demand(node));
        }

        if load > i64::from(spec.capacity()) {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                path_index,
                load,
                capacity: spec.capacity(),
            }));
        }
        if load != i64::from(path.load()) {
            violations.push(Violation::new(ViolationType::LoadMismatch {
                path_index,
                cached: path.load(),
                actual: load,
            }));
        }
    }

    for (node, &count) in seen.iter().enumerate().skip(1) {
        match count {
            0 => violations.push(Violation::new(ViolationType::NodeMissing { node })),
            1 => {}
            _ => violations.push(Violation::new(ViolationType::NodeRepeated { node })),
        }
    }

    violations
}

/// Like [`validate`], but fails with [`Error::Infeasible`] on any violation.
pub fn check(spec: &Spec, paths: &[Path]) -> Result<()> {
    let violations = validate(spec, paths);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::Infeasible(violations))
    }
}
