//! Naming strategies.
//!
//! A strategy is a pair of pure transforms: the agnostic module's identity to
//! the name of the module expected to hold the implementation, and a contract
//! to the fully-qualified name of the expected implementation class.
//!
//! The built-in conventions:
//!
//! | Strategy           | Module name                | Class name              |
//! |--------------------|----------------------------|-------------------------|
//! | `SameModule`       | agnostic module unchanged  | `Ns.IFoo` -> `Ns.Foo`   |
//! | `PlatformSuffixed` | agnostic module + `suffix` | `Ns.IFoo` -> `Ns.Foo`   |
//!
//! Anything else goes through [`ProbingStrategy::Custom`].

use std::fmt;
use std::sync::Arc;

use crate::domain::{Contract, ModuleIdentity};
use crate::error::{ContractViolation, InvalidContract};

/// Marker character leading every conventional interface name.
pub const DEFAULT_INTERFACE_MARKER: char = 'I';

/// Suffix appended to the agnostic module name by the platform convention.
pub const DEFAULT_PLATFORM_SUFFIX: &str = ".Platform";

/// Escape hatch for naming conventions the built-in variants do not cover.
///
/// Implementations must be pure: same input, same output, no side effects.
pub trait NamingConvention: Send + Sync + fmt::Debug {
    /// Name of the module expected to contain the implementation.
    fn platform_module_name(&self, agnostic: &ModuleIdentity) -> String;

    /// Fully-qualified name of the expected implementation class.
    fn implementation_class_name(&self, contract: &Contract) -> Result<String, InvalidContract>;
}

/// A naming strategy in the resolver's priority list.
#[derive(Debug, Clone)]
pub enum ProbingStrategy {
    /// Implementation lives next to the contract, in the agnostic module.
    SameModule { marker: char },
    /// Implementation lives in `<agnostic module><suffix>`.
    PlatformSuffixed { suffix: String, marker: char },
    /// Caller-supplied convention.
    Custom(Arc<dyn NamingConvention>),
}

impl ProbingStrategy {
    pub const fn same_module() -> Self {
        Self::SameModule {
            marker: DEFAULT_INTERFACE_MARKER,
        }
    }

    pub fn platform_suffixed() -> Self {
        Self::with_suffix(DEFAULT_PLATFORM_SUFFIX)
    }

    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self::PlatformSuffixed {
            suffix: suffix.into(),
            marker: DEFAULT_INTERFACE_MARKER,
        }
    }

    pub fn custom(convention: impl NamingConvention + 'static) -> Self {
        Self::Custom(Arc::new(convention))
    }

    /// Same strategy with another interface marker. No effect on `Custom`.
    #[must_use]
    pub fn with_marker(self, marker: char) -> Self {
        match self {
            Self::SameModule { .. } => Self::SameModule { marker },
            Self::PlatformSuffixed { suffix, .. } => Self::PlatformSuffixed { suffix, marker },
            custom @ Self::Custom(_) => custom,
        }
    }

    /// Short label used in logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SameModule { .. } => "same-module",
            Self::PlatformSuffixed { .. } => "platform-suffixed",
            Self::Custom(_) => "custom",
        }
    }

    pub fn platform_module_name(&self, agnostic: &ModuleIdentity) -> String {
        match self {
            Self::SameModule { .. } => agnostic.name.clone(),
            Self::PlatformSuffixed { suffix, .. } => format!("{}{suffix}", agnostic.name),
            Self::Custom(convention) => convention.platform_module_name(agnostic),
        }
    }

    pub fn implementation_class_name(&self, contract: &Contract) -> Result<String, InvalidContract> {
        match self {
            Self::SameModule { marker } | Self::PlatformSuffixed { marker, .. } => {
                conventional_class_name(contract, *marker)
            }
            Self::Custom(convention) => convention.implementation_class_name(contract),
        }
    }
}

impl fmt::Display for ProbingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlatformSuffixed { suffix, .. } => write!(f, "{} ({suffix})", self.label()),
            _ => f.write_str(self.label()),
        }
    }
}

/// The conventional contract-to-class mapping: drop the leading `marker`
/// from the short name and re-qualify with the contract's namespace.
///
/// # Errors
///
/// The contract must be a top-level interface whose name starts with `marker`.
pub fn conventional_class_name(contract: &Contract, marker: char) -> Result<String, InvalidContract> {
    let violation = |violation| InvalidContract {
        contract: contract.full_name(),
        violation,
    };

    if !contract.is_interface() {
        return Err(violation(ContractViolation::NotAnInterface));
    }
    if let Some(outer) = contract.declaring_type() {
        return Err(violation(ContractViolation::Nested(outer.to_string())));
    }
    let Some(short_name) = contract.name().strip_prefix(marker) else {
        return Err(violation(ContractViolation::MissingMarker(marker)));
    };

    if contract.namespace().is_empty() {
        Ok(short_name.to_string())
    } else {
        Ok(format!("{}.{short_name}", contract.namespace()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abstractions() -> ModuleIdentity {
        ModuleIdentity::new("Abstractions").with_version("1.0.0")
    }

    #[test]
    fn same_module_keeps_module_name() {
        let strategy = ProbingStrategy::same_module();
        assert_eq!(strategy.platform_module_name(&abstractions()), "Abstractions");
    }

    #[test]
    fn platform_suffixed_appends_suffix() {
        assert_eq!(
            ProbingStrategy::platform_suffixed().platform_module_name(&abstractions()),
            "Abstractions.Platform"
        );
        assert_eq!(
            ProbingStrategy::with_suffix(".Linux").platform_module_name(&abstractions()),
            "Abstractions.Linux"
        );
    }

    #[test]
    fn both_builtins_share_class_naming() {
        let contract = Contract::interface(abstractions(), "Demo.IDemoService");

        for strategy in [ProbingStrategy::same_module(), ProbingStrategy::platform_suffixed()] {
            assert_eq!(
                strategy.implementation_class_name(&contract).unwrap(),
                "Demo.DemoService"
            );
        }
    }

    #[test]
    fn root_namespace_class_name() {
        let contract = Contract::interface(abstractions(), "IClock");
        assert_eq!(conventional_class_name(&contract, 'I').unwrap(), "Clock");
    }

    #[test]
    fn custom_marker() {
        let contract = Contract::interface(abstractions(), "Demo.TDemoService");
        let strategy = ProbingStrategy::same_module().with_marker('T');

        assert_eq!(
            strategy.implementation_class_name(&contract).unwrap(),
            "Demo.DemoService"
        );
    }

    #[test]
    fn rejects_concrete_contract() {
        let contract = Contract::concrete(abstractions(), "Demo.IDemoService");
        let err = conventional_class_name(&contract, 'I').unwrap_err();
        assert_eq!(err.violation, ContractViolation::NotAnInterface);
    }

    #[test]
    fn rejects_nested_contract() {
        let contract = Contract::nested(abstractions(), "Demo.Outer", "IInner");
        let err = conventional_class_name(&contract, 'I').unwrap_err();
        assert_eq!(err.violation, ContractViolation::Nested("Demo.Outer".to_string()));
    }

    #[test]
    fn rejects_missing_marker() {
        let contract = Contract::interface(abstractions(), "Demo.DemoService");
        let err = conventional_class_name(&contract, 'I').unwrap_err();
        assert_eq!(err.violation, ContractViolation::MissingMarker('I'));
        assert_eq!(err.contract, "Demo.DemoService");
    }

    #[derive(Debug)]
    struct Renaming;

    impl NamingConvention for Renaming {
        fn platform_module_name(&self, agnostic: &ModuleIdentity) -> String {
            agnostic.name.replace("Abstractions", "Implementations")
        }

        fn implementation_class_name(&self, contract: &Contract) -> Result<String, InvalidContract> {
            conventional_class_name(contract, DEFAULT_INTERFACE_MARKER)
                .map(|name| name.replace("Demo", "Impl"))
        }
    }

    #[test]
    fn custom_convention_is_delegated() {
        let strategy = ProbingStrategy::custom(Renaming);
        let contract = Contract::interface(abstractions(), "Demo.IDemoService");

        assert_eq!(strategy.label(), "custom");
        assert_eq!(strategy.platform_module_name(&abstractions()), "Implementations");
        assert_eq!(
            strategy.implementation_class_name(&contract).unwrap(),
            "Impl.ImplService"
        );
    }
}
