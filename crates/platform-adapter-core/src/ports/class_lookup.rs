//! Class lookup port.

use super::LookupError;
use crate::domain::{ClassDescriptor, ModuleHandle};

/// Port for finding a class by name inside a loaded module.
pub trait ClassLookup: Send + Sync {
    /// Look up `class_name` in `module`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the module has no such class. `Err` is reserved for
    /// I/O-level failures; the resolver logs those and treats them as absence.
    fn lookup(
        &self,
        module: &ModuleHandle,
        class_name: &str,
    ) -> Result<Option<ClassDescriptor>, LookupError>;
}
