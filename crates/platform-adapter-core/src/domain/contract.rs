//! Contract descriptors.
//!
//! A contract is the platform-agnostic abstraction a caller asks an
//! implementation for. It is identified by its full name and the identity of
//! the module that declares it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ModuleIdentity;

/// Shape of the type a contract names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractKind {
    /// An interface (trait-like) type. The only shape the default naming
    /// convention accepts.
    Interface,
    /// A concrete type.
    Concrete,
}

/// Identity of an abstract type, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contract {
    module: ModuleIdentity,
    namespace: String,
    name: String,
    kind: ContractKind,
    declaring_type: Option<String>,
}

impl Contract {
    /// Interface contract declared at namespace level.
    ///
    /// `full_name` is split at its last `.` into namespace and short name.
    pub fn interface(module: ModuleIdentity, full_name: &str) -> Self {
        Self::top_level(module, full_name, ContractKind::Interface)
    }

    /// Contract naming a concrete type.
    pub fn concrete(module: ModuleIdentity, full_name: &str) -> Self {
        Self::top_level(module, full_name, ContractKind::Concrete)
    }

    /// Interface contract nested inside `declaring_type` (a full type name).
    pub fn nested(module: ModuleIdentity, declaring_type: &str, name: impl Into<String>) -> Self {
        let (namespace, _) = split_full_name(declaring_type);
        Self {
            module,
            namespace,
            name: name.into(),
            kind: ContractKind::Interface,
            declaring_type: Some(declaring_type.to_string()),
        }
    }

    fn top_level(module: ModuleIdentity, full_name: &str, kind: ContractKind) -> Self {
        let (namespace, name) = split_full_name(full_name);
        Self {
            module,
            namespace,
            name,
            kind,
            declaring_type: None,
        }
    }

    /// Identity of the module declaring the contract.
    pub const fn module(&self) -> &ModuleIdentity {
        &self.module
    }

    /// Namespace the contract lives in (empty for the root namespace).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Short type name, e.g. `IDemoService`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn kind(&self) -> ContractKind {
        self.kind
    }

    pub const fn is_interface(&self) -> bool {
        matches!(self.kind, ContractKind::Interface)
    }

    /// Full name of the enclosing type for nested contracts.
    pub fn declaring_type(&self) -> Option<&str> {
        self.declaring_type.as_deref()
    }

    /// Fully-qualified contract name. Nested contracts use `Outer+Inner`.
    pub fn full_name(&self) -> String {
        match (&self.declaring_type, self.namespace.is_empty()) {
            (Some(outer), _) => format!("{outer}+{}", self.name),
            (None, true) => self.name.clone(),
            (None, false) => format!("{}.{}", self.namespace, self.name),
        }
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

fn split_full_name(full_name: &str) -> (String, String) {
    match full_name.rsplit_once('.') {
        Some((namespace, name)) => (namespace.to_string(), name.to_string()),
        None => (String::new(), full_name.to_string()),
    }
}
