//! The module registry and its capability port implementations.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use platform_adapter_core::{
    ClassDescriptor, ClassLookup, InstantiationError, Instance, Instantiator, LoadError,
    LookupError, ModuleHandle, ModuleIdentity, ModuleLoader, render_signature, signature_of,
};
use serde_json::Value;
use tracing::debug;

use crate::definition::{ClassDefinition, ModuleDefinition};

/// Name of the module every registry starts with. Resolvers built on a
/// registry search it for co-located implementations.
pub const HOME_MODULE_NAME: &str = "PlatformAdapter";

/// Process-wide registry
static GLOBAL_REGISTRY: LazyLock<Arc<ModuleRegistry>> =
    LazyLock::new(|| Arc::new(ModuleRegistry::new()));

/// Thread-safe table of module definitions keyed by module name.
///
/// Implements [`ModuleLoader`], [`ClassLookup`] and [`Instantiator`], so a
/// single registry can back a resolver through
/// [`Capabilities::from_provider`](platform_adapter_core::Capabilities::from_provider).
pub struct ModuleRegistry {
    modules: RwLock<HashMap<String, Arc<ModuleDefinition>>>,
}

impl ModuleRegistry {
    /// Create a registry holding only the empty home module.
    pub fn new() -> Self {
        let home = ModuleDefinition::named(HOME_MODULE_NAME);
        let modules = HashMap::from([(HOME_MODULE_NAME.to_string(), Arc::new(home))]);
        Self {
            modules: RwLock::new(modules),
        }
    }

    /// The process-wide registry.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Register a module, returning the definition it replaced.
    pub fn register(&self, module: ModuleDefinition) -> Option<Arc<ModuleDefinition>> {
        let name = module.identity().name.clone();
        debug!(module = %module.identity(), classes = module.class_names().count(), "Registering module");
        self.write().insert(name, Arc::new(module))
    }

    /// Add a class to the home module.
    pub fn register_in_home(&self, class: ClassDefinition) {
        debug!(class = class.full_name(), "Registering class in home module");
        let mut modules = self.write();
        let mut home = modules
            .get(HOME_MODULE_NAME)
            .map_or_else(|| ModuleDefinition::named(HOME_MODULE_NAME), |m| (**m).clone());
        home.insert_class(class);
        modules.insert(HOME_MODULE_NAME.to_string(), Arc::new(home));
    }

    /// Remove a module. The home module cannot be removed.
    pub fn unregister(&self, name: &str) -> bool {
        if name == HOME_MODULE_NAME {
            return false;
        }
        self.write().remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Registered module names, sorted.
    pub fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Handle to the home module.
    pub fn home_module(&self) -> ModuleHandle {
        let identity = self
            .find(HOME_MODULE_NAME)
            .map_or_else(|| ModuleIdentity::new(HOME_MODULE_NAME), |m| m.identity().clone());
        ModuleHandle::new(identity)
    }

    fn find(&self, name: &str) -> Option<Arc<ModuleDefinition>> {
        self.read().get(name).cloned()
    }

    fn find_class(&self, class: &ClassDescriptor) -> Option<(Arc<ModuleDefinition>, ClassDefinition)> {
        let module = self.find(&class.module().name)?;
        let definition = module.class(class.full_name())?.clone();
        Some((module, definition))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<ModuleDefinition>>> {
        self.modules.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<ModuleDefinition>>> {
        self.modules.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.module_names())
            .finish()
    }
}

/// Whether a registered identity satisfies a requested one. Qualifiers the
/// request leaves out are not checked.
fn satisfies(registered: &ModuleIdentity, requested: &ModuleIdentity) -> bool {
    let version_ok = requested
        .version
        .as_ref()
        .is_none_or(|v| registered.version.as_ref() == Some(v));
    let token_ok = requested
        .public_key_token
        .as_ref()
        .is_none_or(|t| registered.public_key_token.as_ref() == Some(t));
    version_ok && token_ok
}

impl ModuleLoader for ModuleRegistry {
    fn load(&self, identity: &ModuleIdentity) -> Result<ModuleHandle, LoadError> {
        let module = self
            .find(&identity.name)
            .ok_or_else(|| LoadError::NotFound(identity.to_string()))?;

        if !satisfies(module.identity(), identity) {
            return Err(LoadError::LoadFailed {
                module: identity.to_string(),
                reason: format!("registered as {}", module.identity()),
            });
        }

        Ok(ModuleHandle::new(module.identity().clone()))
    }
}

impl ClassLookup for ModuleRegistry {
    fn lookup(
        &self,
        module: &ModuleHandle,
        class_name: &str,
    ) -> Result<Option<ClassDescriptor>, LookupError> {
        let Some(definition) = self.find(&module.identity().name) else {
            return Err(LookupError {
                module: module.identity().to_string(),
                class: class_name.to_string(),
                reason: "module is no longer registered".to_string(),
            });
        };

        Ok(definition
            .class(class_name)
            .map(|class| ClassDescriptor::new(class.full_name(), definition.identity().clone())))
    }
}

impl Instantiator for ModuleRegistry {
    fn construct(
        &self,
        class: &ClassDescriptor,
        args: &[Value],
    ) -> Result<Instance, InstantiationError> {
        let (_, definition) =
            self.find_class(class)
                .ok_or_else(|| InstantiationError::UnknownClass {
                    class: class.full_name().to_string(),
                })?;

        let kinds = signature_of(args);
        let constructor =
            definition
                .find_constructor(&kinds)
                .ok_or_else(|| InstantiationError::NoMatchingConstructor {
                    class: class.full_name().to_string(),
                    signature: render_signature(&kinds),
                })?;

        constructor
            .invoke(args)
            .map_err(|err| InstantiationError::ConstructorFailed {
                class: class.full_name().to_string(),
                reason: format!("{err:#}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_adapter_core::ParamKind;
    use serde_json::json;

    fn registry() -> ModuleRegistry {
        let registry = ModuleRegistry::new();
        registry.register(
            ModuleDefinition::new(
                ModuleIdentity::new("Abstractions.Platform")
                    .with_version("1.0.0")
                    .with_public_key_token("b77a5c56"),
            )
            .with_class(ClassDefinition::new("Demo.DemoService").with_default_constructor(|| "demo")),
        );
        registry.register(ModuleDefinition::named("Abstractions"));
        registry
    }

    #[test]
    fn new_registry_has_home_module() {
        let registry = ModuleRegistry::new();
        assert_eq!(registry.module_names(), [HOME_MODULE_NAME]);
        assert_eq!(registry.home_module().identity().name, HOME_MODULE_NAME);
        assert!(!registry.unregister(HOME_MODULE_NAME));
    }

    #[test]
    fn load_checks_requested_qualifiers() {
        let registry = registry();

        let unqualified = registry.load(&ModuleIdentity::new("Abstractions.Platform")).unwrap();
        assert_eq!(unqualified.identity().version.as_deref(), Some("1.0.0"));

        let matching = ModuleIdentity::new("Abstractions.Platform").with_version("1.0.0");
        assert!(registry.load(&matching).is_ok());

        let wrong_version = ModuleIdentity::new("Abstractions.Platform").with_version("2.0.0");
        assert!(matches!(
            registry.load(&wrong_version),
            Err(LoadError::LoadFailed { .. })
        ));

        let signed = ModuleIdentity::new("Abstractions").with_public_key_token("ff");
        assert!(matches!(registry.load(&signed), Err(LoadError::LoadFailed { .. })));
        assert!(registry.load(&signed.relaxed()).is_ok());

        assert_eq!(
            registry.load(&ModuleIdentity::new("Missing")),
            Err(LoadError::NotFound("Missing".to_string()))
        );
    }

    #[test]
    fn lookup_finds_registered_classes_only() {
        let registry = registry();
        let module = registry.load(&ModuleIdentity::new("Abstractions.Platform")).unwrap();

        let class = registry.lookup(&module, "Demo.DemoService").unwrap().unwrap();
        assert_eq!(class.module().name, "Abstractions.Platform");
        assert!(registry.lookup(&module, "Demo.Other").unwrap().is_none());
    }

    #[test]
    fn lookup_in_unregistered_module_is_an_error() {
        let registry = registry();
        let module = registry.load(&ModuleIdentity::new("Abstractions")).unwrap();
        assert!(registry.unregister("Abstractions"));

        assert!(registry.lookup(&module, "Demo.DemoService").is_err());
    }

    #[test]
    fn construct_selects_overload() {
        let registry = ModuleRegistry::new();
        registry.register_in_home(
            ClassDefinition::new("Demo.Counter")
                .with_default_constructor(|| 0_i64)
                .with_constructor(&[ParamKind::Integer], |args| {
                    Ok(Instance::new("Demo.Counter", args[0].as_i64().unwrap_or_default()))
                }),
        );
        let class = registry
            .lookup(&registry.home_module(), "Demo.Counter")
            .unwrap()
            .unwrap();

        let zero = registry.construct(&class, &[]).unwrap();
        assert_eq!(zero.downcast_ref::<i64>(), Some(&0));
        let five = registry.construct(&class, &[json!(5)]).unwrap();
        assert_eq!(five.downcast_ref::<i64>(), Some(&5));

        assert_eq!(
            registry.construct(&class, &[json!("five")]).unwrap_err(),
            InstantiationError::NoMatchingConstructor {
                class: "Demo.Counter".to_string(),
                signature: "(string)".to_string(),
            }
        );
    }

    #[test]
    fn constructor_errors_keep_context() {
        let registry = ModuleRegistry::new();
        registry.register_in_home(ClassDefinition::new("Demo.Faulty").with_constructor(&[], |_| {
            Err(anyhow::anyhow!("socket closed").context("opening device"))
        }));
        let class = ClassDescriptor::new("Demo.Faulty", ModuleIdentity::new(HOME_MODULE_NAME));

        match registry.construct(&class, &[]) {
            Err(InstantiationError::ConstructorFailed { reason, .. }) => {
                assert_eq!(reason, "opening device: socket closed");
            }
            other => panic!("expected constructor failure, got {other:?}"),
        }
    }

    #[test]
    fn construct_unknown_class() {
        let registry = ModuleRegistry::new();
        let class = ClassDescriptor::new("Demo.Ghost", ModuleIdentity::new("Nowhere"));

        assert!(matches!(
            registry.construct(&class, &[]),
            Err(InstantiationError::UnknownClass { .. })
        ));
    }
}
