//! Process-wide resolver accessor.
//!
//! [`current`] builds the default resolver on first use and hands out the same
//! instance afterwards. Construction runs exactly once even when several
//! threads race on the first call, and a configuration error is cached the
//! same way so every caller sees it.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use platform_adapter_core::{ProbingResolver, SettingsError};
use thiserror::Error;
use tracing::{error, info};

use crate::bootstrap::build_default_resolver;

static DEFAULT_RESOLVER: OnceLock<Result<Arc<ProbingResolver>, SettingsError>> = OnceLock::new();

/// Installed by [`set_resolver`]; takes precedence over the default.
static OVERRIDE: RwLock<Option<Arc<ProbingResolver>>> = RwLock::new(None);

/// The process-wide resolver could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessorError {
    #[error("Platform adapter is misconfigured: {0}")]
    Configuration(#[from] SettingsError),
}

/// The process-wide resolver.
///
/// Returns the override when one is installed, otherwise the default resolver
/// over [`ModuleRegistry::global`](platform_adapter_registry::ModuleRegistry::global)
/// configured from the environment.
pub fn current() -> Result<Arc<ProbingResolver>, AccessorError> {
    if let Some(resolver) = OVERRIDE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return Ok(Arc::clone(resolver));
    }

    DEFAULT_RESOLVER
        .get_or_init(|| match build_default_resolver() {
            Ok(resolver) => {
                info!(strategies = resolver.strategies().len(), "Built process-wide resolver");
                Ok(Arc::new(resolver))
            }
            Err(err) => {
                error!(error = %err, "Failed to build process-wide resolver");
                Err(err)
            }
        })
        .clone()
        .map_err(AccessorError::from)
}

/// Replace the process-wide resolver until [`clear_resolver`] is called.
#[cfg(any(test, feature = "test-utils"))]
pub fn set_resolver(resolver: Arc<ProbingResolver>) {
    info!("Overriding process-wide resolver");
    *OVERRIDE.write().unwrap_or_else(PoisonError::into_inner) = Some(resolver);
}

/// Remove an override installed with [`set_resolver`].
#[cfg(any(test, feature = "test-utils"))]
pub fn clear_resolver() {
    OVERRIDE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
}
