//! Probe outcomes and their aggregation.
//!
//! One [`ProbeOutcome`] is produced per strategy attempt and consumed right
//! away by the resolver. When every attempt misses, the causes are collected
//! into an [`AggregateFailure`] in attempt order: a later "module found but
//! class missing" is usually the actionable one and must stay visible next to
//! an earlier "module not found".

use thiserror::Error;

use crate::domain::ClassDescriptor;

/// Why a single strategy attempt missed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    /// The platform module could not be loaded, even with a relaxed identity.
    #[error(
        "{strategy}: Platform-specific module {module} providing an implementation of {contract} could not be loaded ({reason}). Make sure all necessary platform-specific modules are available."
    )]
    ModuleNotFound {
        strategy: String,
        contract: String,
        module: String,
        reason: String,
    },

    /// The module loaded but neither it nor the home module holds the class.
    #[error(
        "{strategy}: Contract {contract} could not be resolved to class {class} in module {module}{}",
        home_searched(.home_module)
    )]
    ClassNotFound {
        strategy: String,
        contract: String,
        module: String,
        class: String,
        /// Home module searched as a fallback, if any.
        home_module: Option<String>,
    },
}

#[allow(clippy::ref_option)]
fn home_searched(home_module: &Option<String>) -> String {
    home_module
        .as_ref()
        .map_or_else(String::new, |home| format!(" or home module {home}"))
}

impl ProbeFailure {
    pub const fn is_module_not_found(&self) -> bool {
        matches!(self, Self::ModuleNotFound { .. })
    }

    pub const fn is_class_not_found(&self) -> bool {
        matches!(self, Self::ClassNotFound { .. })
    }

    /// Strategy that produced the failure, as displayed.
    pub fn strategy(&self) -> &str {
        match self {
            Self::ModuleNotFound { strategy, .. } | Self::ClassNotFound { strategy, .. } => strategy,
        }
    }

    /// Module identity that was attempted.
    pub fn module(&self) -> &str {
        match self {
            Self::ModuleNotFound { module, .. } | Self::ClassNotFound { module, .. } => module,
        }
    }

    /// Class name that was attempted, if probing got that far.
    pub fn class(&self) -> Option<&str> {
        match self {
            Self::ModuleNotFound { .. } => None,
            Self::ClassNotFound { class, .. } => Some(class),
        }
    }

    /// Home module searched after the platform module missed.
    pub fn home_module(&self) -> Option<&str> {
        match self {
            Self::ModuleNotFound { .. } => None,
            Self::ClassNotFound { home_module, .. } => home_module.as_deref(),
        }
    }
}

/// Outcome of one strategy attempt. Never carries both a class and a cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success(ClassDescriptor),
    Failure(ProbeFailure),
}

impl ProbeOutcome {
    pub const fn is_successful(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub const fn class(&self) -> Option<&ClassDescriptor> {
        match self {
            Self::Success(class) => Some(class),
            Self::Failure(_) => None,
        }
    }

    pub const fn cause(&self) -> Option<&ProbeFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(cause) => Some(cause),
        }
    }

    pub fn into_result(self) -> Result<ClassDescriptor, ProbeFailure> {
        match self {
            Self::Success(class) => Ok(class),
            Self::Failure(cause) => Err(cause),
        }
    }
}

/// Combined failure of every attempted strategy, in attempt order.
///
/// An empty strategy list yields an aggregate with zero causes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No probing strategy resolved {contract} {}", attempts(.causes))]
pub struct AggregateFailure {
    contract: String,
    causes: Vec<ProbeFailure>,
}

impl AggregateFailure {
    pub fn new(contract: impl Into<String>, causes: Vec<ProbeFailure>) -> Self {
        Self {
            contract: contract.into(),
            causes,
        }
    }

    /// Full name of the contract that could not be resolved.
    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub fn causes(&self) -> &[ProbeFailure] {
        &self.causes
    }

    pub fn into_causes(self) -> Vec<ProbeFailure> {
        self.causes
    }

    pub fn len(&self) -> usize {
        self.causes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }
}

/// Attempt count followed by one indented, numbered line per cause.
fn attempts(causes: &[ProbeFailure]) -> String {
    let mut rendered = format!("({} attempted)", causes.len());
    for (index, cause) in causes.iter().enumerate() {
        rendered.push_str(&format!("\n  [{}] {cause}", index + 1));
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModuleIdentity;

    fn module_miss() -> ProbeFailure {
        ProbeFailure::ModuleNotFound {
            strategy: "platform-suffixed (.Platform)".to_string(),
            contract: "Demo.IDemoService".to_string(),
            module: "Abstractions.Platform".to_string(),
            reason: "Module not found: Abstractions.Platform".to_string(),
        }
    }

    fn class_miss() -> ProbeFailure {
        ProbeFailure::ClassNotFound {
            strategy: "same-module".to_string(),
            contract: "Demo.IDemoService".to_string(),
            module: "Abstractions".to_string(),
            class: "Demo.DemoService".to_string(),
            home_module: Some("PlatformAdapter".to_string()),
        }
    }

    #[test]
    fn outcome_is_exclusive() {
        let class = ClassDescriptor::new("Demo.DemoService", ModuleIdentity::new("Abstractions"));
        let success = ProbeOutcome::Success(class.clone());
        let failure = ProbeOutcome::Failure(class_miss());

        assert!(success.is_successful());
        assert_eq!(success.class(), Some(&class));
        assert!(success.cause().is_none());

        assert!(!failure.is_successful());
        assert!(failure.class().is_none());
        assert_eq!(failure.into_result(), Err(class_miss()));
    }

    #[test]
    fn failure_accessors() {
        assert!(module_miss().is_module_not_found());
        assert_eq!(module_miss().module(), "Abstractions.Platform");
        assert_eq!(module_miss().class(), None);

        assert!(class_miss().is_class_not_found());
        assert_eq!(class_miss().class(), Some("Demo.DemoService"));
        assert_eq!(class_miss().home_module(), Some("PlatformAdapter"));
        assert_eq!(class_miss().strategy(), "same-module");
    }

    #[test]
    fn causes_name_strategy_and_home_module() {
        let rendered = class_miss().to_string();
        assert!(rendered.starts_with("same-module: "), "unexpected message: {rendered}");
        assert!(rendered.ends_with("in module Abstractions or home module PlatformAdapter"));

        let without_home = ProbeFailure::ClassNotFound {
            strategy: "custom".to_string(),
            contract: "Demo.IDemoService".to_string(),
            module: "Abstractions.Legacy".to_string(),
            class: "Demo.DemoService".to_string(),
            home_module: None,
        };
        assert!(without_home.to_string().ends_with("in module Abstractions.Legacy"));

        assert!(module_miss().to_string().starts_with("platform-suffixed (.Platform): "));
    }

    #[test]
    fn aggregate_lists_causes_in_order() {
        let aggregate = AggregateFailure::new("Demo.IDemoService", vec![module_miss(), class_miss()]);
        let rendered = aggregate.to_string();

        assert_eq!(aggregate.len(), 2);
        assert!(rendered.starts_with("No probing strategy resolved Demo.IDemoService (2 attempted)"));
        let first = rendered.find("[1]").unwrap();
        let second = rendered.find("[2]").unwrap();
        assert!(first < second);
        assert!(rendered[first..second].contains("Abstractions.Platform"));
        assert!(rendered[second..].contains("Demo.DemoService"));
    }

    #[test]
    fn empty_aggregate() {
        let aggregate = AggregateFailure::new("Demo.IDemoService", Vec::new());
        assert!(aggregate.is_empty());
        assert_eq!(
            aggregate.to_string(),
            "No probing strategy resolved Demo.IDemoService (0 attempted)"
        );
    }
}
