//! Resolver settings and validation.
//!
//! Settings decide which built-in strategies a resolver starts with and how
//! aggressively it probes. They are plain data with serde support so hosts can
//! embed them in their own configuration files; [`ResolverSettings::from_env`]
//! overlays the environment for the process-wide resolver.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::strategy::{DEFAULT_INTERFACE_MARKER, DEFAULT_PLATFORM_SUFFIX, ProbingStrategy};

/// Environment variable selecting the built-in strategy order.
pub const STRATEGY_ORDER_ENV: &str = "PLATFORM_ADAPTER_STRATEGY_ORDER";

/// Environment variable overriding the platform module suffix.
pub const PLATFORM_SUFFIX_ENV: &str = "PLATFORM_ADAPTER_SUFFIX";

/// Order of the two built-in strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyOrder {
    /// Platform-suffixed module first, then the agnostic module itself.
    #[default]
    PlatformFirst,
    /// Agnostic module first, then the platform-suffixed module.
    SameModuleFirst,
}

impl StrategyOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlatformFirst => "platform-first",
            Self::SameModuleFirst => "same-module-first",
        }
    }
}

impl fmt::Display for StrategyOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyOrder {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "platform-first" => Ok(Self::PlatformFirst),
            "same-module-first" => Ok(Self::SameModuleFirst),
            other => Err(SettingsError::UnknownStrategyOrder(other.to_string())),
        }
    }
}

/// Resolver settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverSettings {
    /// Order of the built-in strategies.
    pub strategy_order: StrategyOrder,

    /// Suffix appended by the platform-suffixed strategy.
    pub platform_suffix: String,

    /// Leading character of conventional interface names.
    pub interface_marker: char,

    /// Retry a failed module load once with version and signing stripped.
    pub relax_module_identity: bool,

    /// Also search the resolver's home module for the implementation class.
    pub search_home_module: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            strategy_order: StrategyOrder::default(),
            platform_suffix: DEFAULT_PLATFORM_SUFFIX.to_string(),
            interface_marker: DEFAULT_INTERFACE_MARKER,
            relax_module_identity: true,
            search_home_module: true,
        }
    }
}

impl ResolverSettings {
    /// Defaults overlaid with `PLATFORM_ADAPTER_STRATEGY_ORDER` and
    /// `PLATFORM_ADAPTER_SUFFIX`, then validated.
    pub fn from_env() -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        if let Ok(order) = env::var(STRATEGY_ORDER_ENV) {
            settings.strategy_order = order.parse()?;
        }
        if let Ok(suffix) = env::var(PLATFORM_SUFFIX_ENV) {
            settings.platform_suffix = suffix;
        }

        validate_settings(&settings)?;
        Ok(settings)
    }

    /// The built-in strategies in configured priority order.
    pub fn default_strategies(&self) -> Vec<ProbingStrategy> {
        let platform = ProbingStrategy::with_suffix(self.platform_suffix.clone())
            .with_marker(self.interface_marker);
        let same_module = ProbingStrategy::same_module().with_marker(self.interface_marker);

        match self.strategy_order {
            StrategyOrder::PlatformFirst => vec![platform, same_module],
            StrategyOrder::SameModuleFirst => vec![same_module, platform],
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Unknown strategy order '{0}', expected 'platform-first' or 'same-module-first'")]
    UnknownStrategyOrder(String),

    #[error("Platform suffix cannot be empty")]
    EmptySuffix,

    #[error("Platform suffix '{0}' must start with '.'")]
    SuffixMissingSeparator(String),

    #[error("Interface marker '{0}' must be an alphabetic character")]
    InvalidMarker(char),
}

/// Validate settings values.
pub fn validate_settings(settings: &ResolverSettings) -> Result<(), SettingsError> {
    if settings.platform_suffix.is_empty() {
        return Err(SettingsError::EmptySuffix);
    }
    if !settings.platform_suffix.starts_with('.') {
        return Err(SettingsError::SuffixMissingSeparator(
            settings.platform_suffix.clone(),
        ));
    }
    if !settings.interface_marker.is_alphabetic() {
        return Err(SettingsError::InvalidMarker(settings.interface_marker));
    }
    Ok(())
}
