//! # platform-adapter
//!
//! Resolves platform-agnostic contracts to the platform-specific classes that
//! implement them, by probing naming conventions over a module registry.
//!
//! Most callers only need [`current`]:
//!
//! ```no_run
//! use platform_adapter::{Contract, ModuleIdentity};
//!
//! let contract = Contract::interface(ModuleIdentity::new("Abstractions"), "Abstractions.IDemoService");
//! let _service = platform_adapter::current()?.resolve(&contract, &[])?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Implementations are registered with [`ModuleRegistry::global`] at start-up.
//! Hosts that want their own wiring use [`build_resolver`] with a private
//! registry and settings instead.
#![deny(unused_crate_dependencies)]

mod accessor;
mod bootstrap;

pub use accessor::{AccessorError, current};
#[cfg(any(test, feature = "test-utils"))]
pub use accessor::{clear_resolver, set_resolver};
pub use bootstrap::{build_default_resolver, build_resolver};

// Re-export the public API of the member crates
pub use platform_adapter_core::{
    AggregateFailure, Capabilities, ClassDescriptor, ClassLookup, Contract, ContractKind,
    ContractViolation, IdentityParseError, InstantiationError, Instance, Instantiator,
    InvalidContract, LoadError, LookupError, ModuleHandle, ModuleIdentity, ModuleLoader,
    NamingConvention, PLATFORM_SUFFIX_ENV, ParamKind, ProbeFailure, ProbeOutcome,
    ProbingResolver, ProbingResolverBuilder, ProbingStrategy, ResolveError, ResolveResult,
    ResolverSettings, STRATEGY_ORDER_ENV, SettingsError, StrategyOrder, conventional_class_name,
    validate_settings,
};
pub use platform_adapter_registry::{
    ClassDefinition, Constructor, HOME_MODULE_NAME, ModuleDefinition, ModuleRegistry,
};

/// Re-export of platform-adapter-core for the less common items.
pub mod core {
    pub use platform_adapter_core::*;
}

// Used by the integration tests
#[cfg(test)]
use anyhow as _;
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tracing_subscriber as _;
