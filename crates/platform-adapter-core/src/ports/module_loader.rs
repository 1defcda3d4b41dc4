//! Module loader port.

use super::LoadError;
use crate::domain::{ModuleHandle, ModuleIdentity};

/// Port for loading a named module into the running process.
///
/// Implementations report a missing or unloadable module as a [`LoadError`];
/// the resolver converts it into a per-strategy probe failure.
pub trait ModuleLoader: Send + Sync {
    /// Load the module with the given identity.
    fn load(&self, identity: &ModuleIdentity) -> Result<ModuleHandle, LoadError>;
}

/// Plain functions and closures can act as loaders.
impl<F> ModuleLoader for F
where
    F: Fn(&ModuleIdentity) -> Result<ModuleHandle, LoadError> + Send + Sync,
{
    fn load(&self, identity: &ModuleIdentity) -> Result<ModuleHandle, LoadError> {
        self(identity)
    }
}
