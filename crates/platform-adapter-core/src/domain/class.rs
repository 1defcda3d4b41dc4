//! Handles returned by the capability ports.
//!
//! These are opaque to the resolver: it never inspects or mutates them, it
//! only hands them from one capability to the next or back to the caller.

use std::any::{self, Any};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ModuleIdentity;

/// Handle to a module obtained from a [`ModuleLoader`](crate::ports::ModuleLoader).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleHandle {
    identity: ModuleIdentity,
}

impl ModuleHandle {
    pub const fn new(identity: ModuleIdentity) -> Self {
        Self { identity }
    }

    /// Identity of the module as the loader resolved it.
    pub const fn identity(&self) -> &ModuleIdentity {
        &self.identity
    }
}

/// A concrete, instantiable implementation class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassDescriptor {
    full_name: String,
    module: ModuleIdentity,
}

impl ClassDescriptor {
    pub fn new(full_name: impl Into<String>, module: ModuleIdentity) -> Self {
        Self {
            full_name: full_name.into(),
            module,
        }
    }

    /// Fully-qualified class name, e.g. `Demo.DemoService`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Module the class was found in.
    pub const fn module(&self) -> &ModuleIdentity {
        &self.module
    }
}

impl fmt::Display for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name, self.module)
    }
}

/// An object constructed by an [`Instantiator`](crate::ports::Instantiator).
///
/// The value is type-erased; callers recover it with [`Instance::downcast`]
/// using the type the implementation registered.
pub struct Instance {
    class_name: String,
    value: Box<dyn Any + Send + Sync>,
}

impl Instance {
    pub fn new<T>(class_name: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            class_name: class_name.into(),
            value: Box::new(value),
        }
    }

    /// Name of the class the instance was constructed from.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Recover the concrete value, or get the instance back on a type mismatch.
    pub fn downcast<T: Any>(self) -> Result<Box<T>, Self> {
        match self.value.downcast::<T>() {
            Ok(value) => Ok(value),
            Err(value) => Err(Self {
                class_name: self.class_name,
                value,
            }),
        }
    }

    /// Like [`Instance::downcast`] but returns the value itself.
    pub fn into_inner<T: Any>(self) -> Result<T, Self> {
        self.downcast::<T>().map(|boxed| *boxed)
    }

    pub(crate) fn type_mismatch<T: Any>(&self) -> String {
        format!(
            "instance of {} is not a {}",
            self.class_name,
            any::type_name::<T>()
        )
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class_name", &self.class_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Clock(u64);

    #[test]
    fn downcast_recovers_value() {
        let instance = Instance::new("Demo.Clock", Clock(7));

        assert!(instance.is::<Clock>());
        assert_eq!(instance.downcast_ref::<Clock>(), Some(&Clock(7)));
        assert_eq!(instance.into_inner::<Clock>().unwrap(), Clock(7));
    }

    #[test]
    fn downcast_mismatch_returns_instance() {
        let instance = Instance::new("Demo.Clock", Clock(7));

        let back = instance.downcast::<String>().unwrap_err();
        assert_eq!(back.class_name(), "Demo.Clock");
        assert!(back.type_mismatch::<String>().contains("Demo.Clock"));
        assert!(back.is::<Clock>());
    }

    #[test]
    fn descriptor_display_names_module() {
        let class = ClassDescriptor::new("Demo.DemoService", ModuleIdentity::new("Abstractions"));
        assert_eq!(class.to_string(), "Demo.DemoService (Abstractions)");
    }
}
