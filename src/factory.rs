use alloc::{sync::Arc, vec::Vec};
use core::fmt::{self, Debug, Formatter};

use crate::{
    args::{Args, Instance},
    errors::InstantiateErrorKind,
    key::ServiceKey,
};

type BuildFn = dyn Fn(&mut Args) -> Result<Instance, InstantiateErrorKind> + Send + Sync;

/// Declared dependencies of a builder: parameter name to required service key,
/// in declaration order.
#[derive(Default, Clone)]
pub struct Needs {
    entries: Vec<(&'static str, ServiceKey)>,
}

impl Needs {
    #[inline]
    pub(crate) fn push(&mut self, name: &'static str, service: ServiceKey) {
        self.entries.push((name, service));
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ServiceKey)> + '_ {
        self.entries.iter().copied()
    }

    #[inline]
    #[must_use]
    pub fn contains_service(&self, service: &ServiceKey) -> bool {
        self.entries.iter().any(|(_, key)| key == service)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A builder paired with the metadata the resolution engine needs: the
/// declared parameter names and the subset of them that are dependencies.
///
/// The builder receives the assembled [`Args`] and takes its parameters out
/// of them by name:
///
/// ```rust
/// use wirebox::{Args, Factory, InstantiateErrorKind};
///
/// struct Logger;
/// struct Service { logger: std::sync::Arc<Logger> }
///
/// let factory = Factory::new(|args: &mut Args| {
///     Ok(Service { logger: args.take("logger")? })
/// })
/// .needs::<Logger>("logger");
/// ```
#[derive(Clone)]
pub struct Factory {
    pub(crate) params: Vec<&'static str>,
    pub(crate) needs: Needs,
    build: Arc<BuildFn>,
}

impl Factory {
    #[must_use]
    pub fn new<T, F>(build: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut Args) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    {
        Self {
            params: Vec::new(),
            needs: Needs::default(),
            build: Arc::new(move |args| build(args).map(|value| Arc::new(value) as Instance)),
        }
    }

    /// Declares a parameter satisfied by resolving `T`
    #[must_use]
    pub fn needs<T: ?Sized + 'static>(self, name: &'static str) -> Self {
        self.needs_key(name, ServiceKey::of::<T>())
    }

    /// Declares a parameter satisfied by resolving every registered implementation of `T`
    #[must_use]
    pub fn needs_all<T: ?Sized + 'static>(self, name: &'static str) -> Self {
        self.needs_key(name, ServiceKey::all_of::<T>())
    }

    /// Declares a parameter satisfied by resolving the given key
    #[must_use]
    pub fn needs_key(mut self, name: &'static str, service: ServiceKey) -> Self {
        self.params.push(name);
        self.needs.push(name, service);
        self
    }

    /// Declares a parameter that is not a dependency.
    /// It can only be supplied through explicit or override arguments.
    #[must_use]
    pub fn param(mut self, name: &'static str) -> Self {
        self.params.push(name);
        self
    }

    #[inline]
    pub(crate) fn call(&self, args: &mut Args) -> Result<Instance, InstantiateErrorKind> {
        (self.build)(args)
    }

    #[inline]
    #[must_use]
    pub(crate) fn declares_param(&self, name: &str) -> bool {
        self.params.iter().any(|param| *param == name)
    }
}

impl Debug for Factory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory").field("params", &self.params).finish_non_exhaustive()
    }
}

/// Wrapper to create a factory that just returns the passed value.
/// It's used for instance registrations, where the value was created outside the container.
#[inline]
#[must_use]
pub(crate) fn instance(value: Instance) -> Factory {
    Factory {
        params: Vec::new(),
        needs: Needs::default(),
        build: Arc::new(move |_args| Ok(value.clone())),
    }
}

/// Construction plan of a concrete type: its own service key plus the factory
/// that builds it. This is what "a constructible type identity" means to the
/// engine, and what a needs extractor hands back.
#[derive(Clone)]
pub struct Blueprint {
    pub(crate) service: ServiceKey,
    pub(crate) factory: Factory,
}

impl Blueprint {
    #[must_use]
    pub fn new<T: Send + Sync + 'static>(factory: Factory) -> Self {
        Self {
            service: ServiceKey::of::<T>(),
            factory,
        }
    }

    #[inline]
    #[must_use]
    pub fn service(&self) -> ServiceKey {
        self.service
    }
}

/// A type that publishes its own construction plan
pub trait Injectable: Send + Sync + Sized + 'static {
    fn blueprint() -> Blueprint;
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{instance, Factory};
    use crate::{key::ServiceKey, Args};

    use alloc::sync::Arc;
    use alloc::vec;

    struct Logger;

    #[test]
    fn test_declared_params() {
        let factory = Factory::new(|_args| Ok(()))
            .needs::<Logger>("logger")
            .param("greeting")
            .needs_key("repo", ServiceKey::named("repo"));

        assert_eq!(factory.params, vec!["logger", "greeting", "repo"]);
        assert!(factory.declares_param("greeting"));
        assert!(!factory.declares_param("other"));
        assert!(factory.needs.contains_service(&ServiceKey::of::<Logger>()));
        assert!(factory.needs.contains_service(&ServiceKey::named("repo")));
        assert!(!factory.needs.contains_service(&ServiceKey::named("greeting")));
    }

    #[test]
    fn test_needs_order() {
        let factory = Factory::new(|_args| Ok(())).needs::<Logger>("b").needs::<()>("a");

        let names: vec::Vec<&str> = factory.needs.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_instance_thunk() {
        let value = Arc::new(42_i32);
        let factory = instance(value.clone());

        let first = factory.call(&mut Args::new()).unwrap();
        let second = factory.call(&mut Args::new()).unwrap();

        assert!(Arc::ptr_eq(&first.downcast::<i32>().unwrap(), &value));
        assert!(Arc::ptr_eq(&second.downcast::<i32>().unwrap(), &value));
        assert!(factory.needs.is_empty());
    }
}
