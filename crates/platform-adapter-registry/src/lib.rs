//! In-process module registry for platform-adapter.
//!
//! Modules are declared up front as [`ModuleDefinition`]s holding named
//! classes and their constructor overloads. [`ModuleRegistry`] implements all
//! three capability ports, so one registry is enough to back a
//! [`ProbingResolver`](platform_adapter_core::ProbingResolver).
#![deny(unused_crate_dependencies)]

mod definition;
mod registry;

pub use definition::{ClassDefinition, Constructor, ModuleDefinition};
pub use registry::{HOME_MODULE_NAME, ModuleRegistry};

// Used by the integration tests
#[cfg(test)]
use tracing_subscriber as _;
