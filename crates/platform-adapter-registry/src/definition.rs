//! Module and class definitions registered with a [`ModuleRegistry`](crate::ModuleRegistry).
//!
//! A definition stands in for a loadable module: a name→factory table built
//! at start-up instead of a binary discovered at run time.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use platform_adapter_core::{Instance, ModuleIdentity, ParamKind};
use serde_json::Value;

type Factory = dyn Fn(&[Value]) -> anyhow::Result<Instance> + Send + Sync;

/// One constructor overload.
#[derive(Clone)]
pub struct Constructor {
    params: Vec<ParamKind>,
    factory: Arc<Factory>,
}

impl Constructor {
    pub fn params(&self) -> &[ParamKind] {
        &self.params
    }

    /// Whether the overload accepts arguments of the given kinds.
    pub fn accepts(&self, args: &[ParamKind]) -> bool {
        self.params.len() == args.len()
            && self
                .params
                .iter()
                .zip(args)
                .all(|(param, arg)| param.accepts(*arg))
    }

    pub(crate) fn invoke(&self, args: &[Value]) -> anyhow::Result<Instance> {
        (self.factory)(args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// An implementation class and its constructor overloads.
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    full_name: String,
    constructors: Vec<Constructor>,
}

impl ClassDefinition {
    /// Create a class with no constructors. It can be found but not instantiated.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            constructors: Vec::new(),
        }
    }

    /// Add a constructor overload taking parameters of the given kinds.
    ///
    /// The factory only runs when the supplied arguments match `params`.
    #[must_use]
    pub fn with_constructor<F>(mut self, params: &[ParamKind], factory: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Instance> + Send + Sync + 'static,
    {
        self.constructors.push(Constructor {
            params: params.to_vec(),
            factory: Arc::new(factory),
        });
        self
    }

    /// Add a parameterless constructor producing the value `make` returns.
    #[must_use]
    pub fn with_default_constructor<T, F>(self, make: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let class_name = self.full_name.clone();
        self.with_constructor(&[], move |_| Ok(Instance::new(class_name.clone(), make())))
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// First overload accepting arguments of the given kinds.
    pub fn find_constructor(&self, args: &[ParamKind]) -> Option<&Constructor> {
        self.constructors.iter().find(|ctor| ctor.accepts(args))
    }
}

/// A module: an identity plus the classes it provides.
#[derive(Debug, Clone)]
pub struct ModuleDefinition {
    identity: ModuleIdentity,
    classes: BTreeMap<String, ClassDefinition>,
}

impl ModuleDefinition {
    pub fn new(identity: ModuleIdentity) -> Self {
        Self {
            identity,
            classes: BTreeMap::new(),
        }
    }

    /// Unqualified module.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(ModuleIdentity::new(name))
    }

    /// Add a class, replacing any class of the same name.
    #[must_use]
    pub fn with_class(mut self, class: ClassDefinition) -> Self {
        self.insert_class(class);
        self
    }

    pub(crate) fn insert_class(&mut self, class: ClassDefinition) {
        self.classes.insert(class.full_name.clone(), class);
    }

    pub const fn identity(&self) -> &ModuleIdentity {
        &self.identity
    }

    pub fn class(&self, full_name: &str) -> Option<&ClassDefinition> {
        self.classes.get(full_name)
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overloads_are_selected_by_kind() {
        let class = ClassDefinition::new("Demo.Counter")
            .with_constructor(&[], |_| Ok(Instance::new("Demo.Counter", 0_i64)))
            .with_constructor(&[ParamKind::Integer], |args| {
                let start = args[0].as_i64().unwrap_or_default();
                Ok(Instance::new("Demo.Counter", start))
            });

        assert!(class.find_constructor(&[]).is_some());
        let ctor = class.find_constructor(&[ParamKind::Integer]).unwrap();
        let instance = ctor.invoke(&[json!(5)]).unwrap();
        assert_eq!(instance.downcast_ref::<i64>(), Some(&5));
        assert!(class.find_constructor(&[ParamKind::String]).is_none());
        assert!(class.find_constructor(&[ParamKind::Integer, ParamKind::Integer]).is_none());
    }

    #[test]
    fn any_parameter_matches_everything() {
        let class = ClassDefinition::new("Demo.Echo")
            .with_constructor(&[ParamKind::Any], |args| Ok(Instance::new("Demo.Echo", args[0].clone())));

        assert!(class.find_constructor(&[ParamKind::Object]).is_some());
        assert!(class.find_constructor(&[ParamKind::Null]).is_some());
    }

    #[test]
    fn default_constructor_uses_class_name() {
        let class = ClassDefinition::new("Demo.Clock").with_default_constructor(|| 42_u64);
        let instance = class.find_constructor(&[]).unwrap().invoke(&[]).unwrap();

        assert_eq!(instance.class_name(), "Demo.Clock");
        assert_eq!(instance.downcast_ref::<u64>(), Some(&42));
    }

    #[test]
    fn module_replaces_class_of_same_name() {
        let module = ModuleDefinition::named("Abstractions")
            .with_class(ClassDefinition::new("Demo.A"))
            .with_class(ClassDefinition::new("Demo.A").with_default_constructor(|| ()))
            .with_class(ClassDefinition::new("Demo.B"));

        assert_eq!(module.class_names().collect::<Vec<_>>(), ["Demo.A", "Demo.B"]);
        assert_eq!(module.class("Demo.A").unwrap().constructors().len(), 1);
    }
}
