//! Domain types shared by the resolver and its capabilities.

mod args;
mod class;
mod contract;
mod identity;

pub use args::{ParamKind, render_signature, signature_of};
pub use class::{ClassDescriptor, Instance, ModuleHandle};
pub use contract::{Contract, ContractKind};
pub use identity::{IdentityParseError, ModuleIdentity};
