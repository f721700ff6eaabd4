//! Crate-wide error type.

use thiserror::Error as ThisError;

use crate::evaluation::Violation;

/// Errors surfaced by problem setup, configuration, and route construction.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    /// The problem instance is malformed (rejected before any search work).
    #[error("invalid spec: {0}")]
    InvalidSpec(String),
    /// A tuning parameter is out of range (rejected before any search work).
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// The cluster-merge bookkeeping reached an inconsistent state.
    #[error("construction invariant violated: {0}")]
    Construction(String),
    /// A finished path set failed feasibility validation.
    #[error("infeasible route: {} violation(s), first: {:?}", .0.len(), .0.first())]
    Infeasible(Vec<Violation>),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidSpec(message.into())
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }
}
