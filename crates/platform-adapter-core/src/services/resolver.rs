//! Probing resolver service.
//!
//! The resolver walks its strategies in priority order. For each one it
//! derives the platform module name, loads the module (retrying once with a
//! relaxed identity), derives the implementation class name and looks the
//! class up in that module and then in the home module. The first hit wins;
//! later strategies are never attempted. Misses are collected per strategy and
//! only raised, as one aggregate, when the caller demands success.
//!
//! Nothing is cached: every call probes again. Callers that care about the
//! cost keep the returned [`ClassDescriptor`].

use std::any::Any;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::domain::{ClassDescriptor, Contract, Instance, ModuleHandle, ModuleIdentity};
use crate::error::{InvalidContract, ResolveError, ResolveResult};
use crate::outcome::{AggregateFailure, ProbeFailure, ProbeOutcome};
use crate::ports::{Capabilities, InstantiationError, LoadError};
use crate::settings::ResolverSettings;
use crate::strategy::ProbingStrategy;

/// Resolves contracts to platform-specific implementations.
///
/// The strategy list is shared state: resolution reads a snapshot of it and
/// [`ProbingResolver::add_strategy`] appends under the same lock, so no call
/// ever observes a half-updated list. Probing itself runs outside the lock,
/// so concurrent resolutions do not serialize on each other.
pub struct ProbingResolver {
    capabilities: Capabilities,
    strategies: RwLock<Vec<ProbingStrategy>>,
    /// Module searched when the platform module lacks the class.
    home_module: Option<ModuleHandle>,
    relax_module_identity: bool,
}

impl ProbingResolver {
    /// Create a resolver with an explicit strategy list and default settings.
    pub fn new(capabilities: Capabilities, strategies: Vec<ProbingStrategy>) -> Self {
        Self::builder(capabilities).strategies(strategies).build()
    }

    pub fn builder(capabilities: Capabilities) -> ProbingResolverBuilder {
        ProbingResolverBuilder::new(capabilities)
    }

    /// Append a strategy to the end of the priority list.
    pub fn add_strategy(&self, strategy: ProbingStrategy) {
        debug!(strategy = %strategy, "Adding probing strategy");
        self.strategies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(strategy);
    }

    /// Snapshot of the current priority list.
    pub fn strategies(&self) -> Vec<ProbingStrategy> {
        self.strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub const fn home_module(&self) -> Option<&ModuleHandle> {
        self.home_module.as_ref()
    }

    /// Resolve and construct an implementation; fails on any miss.
    pub fn resolve(&self, contract: &Contract, args: &[Value]) -> ResolveResult<Instance> {
        let class = self.resolve_class(contract)?;
        self.capabilities
            .instantiator
            .construct(&class, args)
            .map_err(|source| ResolveError::InstantiationFailed {
                class: class.full_name().to_string(),
                source,
            })
    }

    /// Resolve and construct an implementation; `None` on a miss or a
    /// construction failure.
    pub fn try_resolve(&self, contract: &Contract, args: &[Value]) -> ResolveResult<Option<Instance>> {
        self.resolve_instance(contract, args, false)
    }

    /// Resolve, construct and downcast to `T`.
    pub fn resolve_as<T: Any>(&self, contract: &Contract, args: &[Value]) -> ResolveResult<T> {
        let instance = self.resolve(contract, args)?;
        instance.into_inner::<T>().map_err(|instance| ResolveError::InstantiationFailed {
            class: instance.class_name().to_string(),
            source: InstantiationError::ConstructorFailed {
                class: instance.class_name().to_string(),
                reason: instance.type_mismatch::<T>(),
            },
        })
    }

    /// Resolve the implementation class; fails with an aggregate on a miss.
    ///
    /// The aggregate carries one cause per attempted strategy. An empty
    /// strategy list yields an aggregate with no causes.
    pub fn resolve_class(&self, contract: &Contract) -> ResolveResult<ClassDescriptor> {
        self.probe_all(contract)?.map_err(|causes| {
            let failure = AggregateFailure::new(contract.full_name(), causes);
            warn!(contract = %contract, attempted = failure.len(), "No probing strategy resolved contract");
            failure.into()
        })
    }

    /// Resolve the implementation class; `None` on a miss.
    pub fn try_resolve_class(&self, contract: &Contract) -> ResolveResult<Option<ClassDescriptor>> {
        Ok(self.probe_all(contract)?.ok())
    }

    /// Resolve the implementation class and construct it with `args`.
    ///
    /// With `must_succeed` a construction failure propagates as
    /// [`ResolveError::InstantiationFailed`]; without it the failure is
    /// swallowed and `None` is returned, indistinguishable from a miss.
    pub fn resolve_instance(
        &self,
        contract: &Contract,
        args: &[Value],
        must_succeed: bool,
    ) -> ResolveResult<Option<Instance>> {
        if must_succeed {
            return self.resolve(contract, args).map(Some);
        }

        let Some(class) = self.try_resolve_class(contract)? else {
            return Ok(None);
        };
        match self.capabilities.instantiator.construct(&class, args) {
            Ok(instance) => Ok(Some(instance)),
            Err(err) => {
                debug!(class = %class, error = %err, "Instantiation failed, returning nothing");
                Ok(None)
            }
        }
    }

    /// Resolve the implementation class by trying every strategy in order.
    ///
    /// Returns on the first strategy that finds a class. When all of them miss,
    /// `must_succeed` decides between an [`AggregateFailure`] and `Ok(None)`.
    ///
    /// An [`InvalidContract`] is raised immediately regardless of `must_succeed`.
    pub fn resolve_class_descriptor(
        &self,
        contract: &Contract,
        must_succeed: bool,
    ) -> ResolveResult<Option<ClassDescriptor>> {
        if must_succeed {
            self.resolve_class(contract).map(Some)
        } else {
            self.try_resolve_class(contract)
        }
    }

    /// Single-strategy resolution: runs only `strategy` and surfaces its cause
    /// directly instead of wrapping it in an aggregate.
    pub fn probe_with(
        &self,
        strategy: &ProbingStrategy,
        contract: &Contract,
    ) -> ResolveResult<ClassDescriptor> {
        Ok(self.probe(strategy, contract)?.into_result()?)
    }

    /// The first class any strategy finds, or every miss in attempt order.
    fn probe_all(
        &self,
        contract: &Contract,
    ) -> Result<Result<ClassDescriptor, Vec<ProbeFailure>>, InvalidContract> {
        let strategies = self.strategies();
        let mut causes = Vec::with_capacity(strategies.len());

        for strategy in &strategies {
            match self.probe(strategy, contract)? {
                ProbeOutcome::Success(class) => {
                    debug!(contract = %contract, strategy = %strategy, class = %class, "Resolved contract");
                    return Ok(Ok(class));
                }
                ProbeOutcome::Failure(cause) => {
                    debug!(contract = %contract, strategy = %strategy, cause = %cause, "Strategy missed");
                    causes.push(cause);
                }
            }
        }

        Ok(Err(causes))
    }

    fn probe(
        &self,
        strategy: &ProbingStrategy,
        contract: &Contract,
    ) -> Result<ProbeOutcome, InvalidContract> {
        let agnostic = contract.module();
        let identity = agnostic.renamed(strategy.platform_module_name(agnostic));

        let module = match self.load_module(&identity) {
            Ok(module) => module,
            Err(err) => {
                return Ok(ProbeOutcome::Failure(ProbeFailure::ModuleNotFound {
                    strategy: strategy.to_string(),
                    contract: contract.full_name(),
                    module: identity.to_string(),
                    reason: err.to_string(),
                }));
            }
        };

        let class_name = strategy.implementation_class_name(contract)?;
        if let Some(class) = self.lookup(&module, &class_name) {
            return Ok(ProbeOutcome::Success(class));
        }

        let home = self
            .home_module
            .as_ref()
            .filter(|home| home.identity().name != module.identity().name);
        if let Some(home) = home {
            debug!(class = %class_name, module = %home.identity(), "Falling back to home module");
            if let Some(class) = self.lookup(home, &class_name) {
                return Ok(ProbeOutcome::Success(class));
            }
        }

        Ok(ProbeOutcome::Failure(ProbeFailure::ClassNotFound {
            strategy: strategy.to_string(),
            contract: contract.full_name(),
            module: module.identity().to_string(),
            class: class_name,
            home_module: home.map(|home| home.identity().to_string()),
        }))
    }

    fn load_module(&self, identity: &ModuleIdentity) -> Result<ModuleHandle, LoadError> {
        let loader = &self.capabilities.loader;
        match loader.load(identity) {
            Ok(module) => Ok(module),
            Err(err) if self.relax_module_identity && identity.is_qualified() => {
                let relaxed = identity.relaxed();
                debug!(module = %identity, error = %err, "Retrying module load without version and signing");
                loader.load(&relaxed).map_err(|retry| LoadError::LoadFailed {
                    module: identity.to_string(),
                    reason: format!("{err}; retry as {relaxed} also failed: {retry}"),
                })
            }
            Err(err) => Err(err),
        }
    }

    fn lookup(&self, module: &ModuleHandle, class_name: &str) -> Option<ClassDescriptor> {
        match self.capabilities.lookup.lookup(module, class_name) {
            Ok(found) => found,
            Err(err) => {
                trace!(error = %err, "Class lookup failed, treating as not found");
                None
            }
        }
    }
}

impl fmt::Debug for ProbingResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbingResolver")
            .field("strategies", &self.strategies())
            .field("home_module", &self.home_module)
            .field("relax_module_identity", &self.relax_module_identity)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ProbingResolver`].
///
/// Without an explicit strategy list the resolver starts with the built-in
/// strategies in the order the settings name.
#[derive(Debug)]
pub struct ProbingResolverBuilder {
    capabilities: Capabilities,
    strategies: Option<Vec<ProbingStrategy>>,
    home_module: Option<ModuleHandle>,
    settings: ResolverSettings,
}

impl ProbingResolverBuilder {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            strategies: None,
            home_module: None,
            settings: ResolverSettings::default(),
        }
    }

    /// Replace the strategy list.
    #[must_use]
    pub fn strategies(mut self, strategies: Vec<ProbingStrategy>) -> Self {
        self.strategies = Some(strategies);
        self
    }

    /// Append one strategy to the explicit list.
    #[must_use]
    pub fn strategy(mut self, strategy: ProbingStrategy) -> Self {
        self.strategies.get_or_insert_with(Vec::new).push(strategy);
        self
    }

    /// Module searched for co-located implementations.
    #[must_use]
    pub fn home_module(mut self, module: ModuleHandle) -> Self {
        self.home_module = Some(module);
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: ResolverSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> ProbingResolver {
        let strategies = self
            .strategies
            .unwrap_or_else(|| self.settings.default_strategies());
        let home_module = self.home_module.filter(|_| self.settings.search_home_module);

        ProbingResolver {
            capabilities: self.capabilities,
            strategies: RwLock::new(strategies),
            home_module,
            relax_module_identity: self.settings.relax_module_identity,
        }
    }
}
