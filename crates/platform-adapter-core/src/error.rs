//! Resolver error types.
//!
//! Probe misses (module or class not found) are collected per strategy and
//! only surface as a [`ResolveError::Aggregate`] when the caller asked for a
//! must-succeed resolution. Contract violations and constructor faults are
//! not probe misses and surface immediately.

use thiserror::Error;

use crate::outcome::{AggregateFailure, ProbeFailure};
use crate::ports::InstantiationError;

/// Ways a contract can violate the conventional naming precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("it is not an interface")]
    NotAnInterface,

    #[error("it is nested inside {0}")]
    Nested(String),

    #[error("its name does not start with '{0}'")]
    MissingMarker(char),
}

/// A contract that cannot be mapped to an implementation class name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid contract {contract}: {violation}")]
pub struct InvalidContract {
    /// Full name of the offending contract.
    pub contract: String,
    pub violation: ContractViolation,
}

/// Errors surfaced by [`ProbingResolver`](crate::services::ProbingResolver).
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The contract failed a naming strategy's shape precondition.
    #[error(transparent)]
    InvalidContract(#[from] InvalidContract),

    /// An implementation class was found but could not be constructed.
    #[error("Failed to instantiate {class}: {source}")]
    InstantiationFailed {
        class: String,
        #[source]
        source: InstantiationError,
    },

    /// Single-strategy resolution failed.
    #[error(transparent)]
    Probe(#[from] ProbeFailure),

    /// Every configured strategy failed.
    #[error(transparent)]
    Aggregate(#[from] AggregateFailure),
}

impl ResolveError {
    /// Per-strategy causes when this is a probing failure.
    pub fn causes(&self) -> &[ProbeFailure] {
        match self {
            Self::Aggregate(aggregate) => aggregate.causes(),
            Self::Probe(cause) => std::slice::from_ref(cause),
            Self::InvalidContract(_) | Self::InstantiationFailed { .. } => &[],
        }
    }

    pub const fn is_instantiation_failure(&self) -> bool {
        matches!(self, Self::InstantiationFailed { .. })
    }
}

/// Result type alias for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
