//! Port definitions (trait abstractions) for the capabilities the resolver
//! orchestrates.
//!
//! The resolver never loads modules, inspects them, or constructs objects
//! itself. Those three capabilities are injected through the narrow traits
//! below, so the probing algorithm is written once regardless of how a host
//! provides them (static registry, dynamic linking, test doubles).
//!
//! # Design Rules
//!
//! - Only domain types appear in signatures
//! - "Not found" is a value (`Ok(None)`) for class lookup, never an error
//! - Implementations must be safe to call concurrently

pub mod class_lookup;
pub mod instantiator;
pub mod module_loader;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

pub use class_lookup::ClassLookup;
pub use instantiator::Instantiator;
pub use module_loader::ModuleLoader;

/// Container for the three capability trait objects.
///
/// This gives the resolver and the composition root one consistent way to
/// pass capabilities around without naming concrete implementations.
#[derive(Clone)]
pub struct Capabilities {
    /// Loads a module by identity.
    pub loader: Arc<dyn ModuleLoader>,
    /// Finds a class inside a loaded module.
    pub lookup: Arc<dyn ClassLookup>,
    /// Constructs objects from class descriptors.
    pub instantiator: Arc<dyn Instantiator>,
}

impl Capabilities {
    /// Create a new capabilities container.
    pub fn new(
        loader: Arc<dyn ModuleLoader>,
        lookup: Arc<dyn ClassLookup>,
        instantiator: Arc<dyn Instantiator>,
    ) -> Self {
        Self {
            loader,
            lookup,
            instantiator,
        }
    }

    /// Wire all three capabilities to a single provider.
    pub fn from_provider<P>(provider: Arc<P>) -> Self
    where
        P: ModuleLoader + ClassLookup + Instantiator + 'static,
    {
        Self {
            loader: Arc::clone(&provider) as Arc<dyn ModuleLoader>,
            lookup: Arc::clone(&provider) as Arc<dyn ClassLookup>,
            instantiator: provider,
        }
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities").finish_non_exhaustive()
    }
}

/// Errors raised by a [`ModuleLoader`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// No module with the requested identity could be located.
    #[error("Module not found: {0}")]
    NotFound(String),

    /// A module was located but could not be loaded under the requested identity.
    #[error("Module {module} could not be loaded: {reason}")]
    LoadFailed { module: String, reason: String },
}

/// I/O-level failure of a [`ClassLookup`]. Absence is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Class lookup of {class} in module {module} failed: {reason}")]
pub struct LookupError {
    pub module: String,
    pub class: String,
    pub reason: String,
}

/// Errors raised by an [`Instantiator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstantiationError {
    /// The class has no constructor matching the supplied arguments.
    #[error("Class {class} has no constructor accepting {signature}")]
    NoMatchingConstructor { class: String, signature: String },

    /// The instantiator does not know the class.
    #[error("Class {class} is unknown to the instantiator")]
    UnknownClass { class: String },

    /// A matching constructor ran and failed.
    #[error("Constructor of {class} failed: {reason}")]
    ConstructorFailed { class: String, reason: String },
}
