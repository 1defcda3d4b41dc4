//! Core of platform-adapter: resolves platform-agnostic contracts to
//! platform-specific implementation classes by probing naming conventions.
//!
//! The crate holds no loading machinery of its own. Module loading, class
//! lookup and instantiation are injected through [`ports`], and
//! [`ProbingResolver`] orchestrates them over an ordered list of
//! [`ProbingStrategy`] values.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod outcome;
pub mod ports;
pub mod services;
pub mod settings;
pub mod strategy;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types for convenience
pub use domain::{
    ClassDescriptor, Contract, ContractKind, IdentityParseError, Instance, ModuleHandle,
    ModuleIdentity, ParamKind, render_signature, signature_of,
};
pub use error::{ContractViolation, InvalidContract, ResolveError, ResolveResult};
pub use outcome::{AggregateFailure, ProbeFailure, ProbeOutcome};
pub use ports::{
    Capabilities, ClassLookup, InstantiationError, Instantiator, LoadError, LookupError,
    ModuleLoader,
};
pub use services::{ProbingResolver, ProbingResolverBuilder};
pub use settings::{
    PLATFORM_SUFFIX_ENV, ResolverSettings, STRATEGY_ORDER_ENV, SettingsError, StrategyOrder,
    validate_settings,
};
pub use strategy::{
    DEFAULT_INTERFACE_MARKER, DEFAULT_PLATFORM_SUFFIX, NamingConvention, ProbingStrategy,
    conventional_class_name,
};

// Silence unused dev-dependency warnings; both are used by the integration tests
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tracing_subscriber as _;
