//! Composition root: wires a registry and settings into a resolver.

use std::sync::Arc;

use platform_adapter_core::{
    Capabilities, ProbingResolver, ResolverSettings, SettingsError, validate_settings,
};
use platform_adapter_registry::ModuleRegistry;
use tracing::debug;

/// Build a resolver backed by `registry`.
///
/// The registry provides all three capabilities and its home module serves
/// the co-located fallback lookup. Strategies come from `settings`.
pub fn build_resolver(
    registry: Arc<ModuleRegistry>,
    settings: ResolverSettings,
) -> Result<ProbingResolver, SettingsError> {
    validate_settings(&settings)?;

    let home = registry.home_module();
    debug!(order = %settings.strategy_order, suffix = %settings.platform_suffix, "Building resolver");

    Ok(ProbingResolver::builder(Capabilities::from_provider(registry))
        .home_module(home)
        .settings(settings)
        .build())
}

/// Build the default-configured resolver: the global registry with settings
/// read from the environment.
pub fn build_default_resolver() -> Result<ProbingResolver, SettingsError> {
    build_resolver(ModuleRegistry::global(), ResolverSettings::from_env()?)
}
