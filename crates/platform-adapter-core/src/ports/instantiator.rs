//! Instantiation port.

use serde_json::Value;

use super::InstantiationError;
use crate::domain::{ClassDescriptor, Instance};

/// Port for constructing an object from a class descriptor.
pub trait Instantiator: Send + Sync {
    /// Construct an instance of `class`, passing `args` to its constructor.
    ///
    /// Fails when no constructor matches the arguments or when the matching
    /// constructor itself fails.
    fn construct(
        &self,
        class: &ClassDescriptor,
        args: &[Value],
    ) -> Result<Instance, InstantiationError>;
}
