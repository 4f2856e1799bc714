use alloc::{boxed::Box, collections::BTreeMap, sync::Arc, vec::Vec};
use core::any::Any;
use tracing::debug;

use crate::{
    args::{Args, Instance},
    context::ResolutionContext,
    errors::RegistryErrorKind,
    extractor::NeedsExtractor,
    factory::{instance, Blueprint, Factory, Injectable},
    key::ServiceKey,
    scope::Scope,
};

/// One way to satisfy a service key. Immutable once appended; alternatives
/// for the same key form an ordered list in registration order.
pub(crate) struct Registration {
    pub(crate) service: ServiceKey,
    pub(crate) scope: Scope,
    pub(crate) factory: Factory,
    pub(crate) args: Args,
}

impl Registration {
    /// Whether the registration depends on its own service key,
    /// i.e. layers over the registration below it on the alternative stack
    #[inline]
    #[must_use]
    pub(crate) fn needs_itself(&self) -> bool {
        self.factory.needs.contains_service(&self.service)
    }
}

/// What implements a service: a callable (factory or blueprint), a pre-built
/// instance, or the service itself.
pub enum Provider {
    /// The service key is its own implementation; the registry asks its
    /// needs extractor for the construction plan
    Itself,
    /// A dynamically typed callable. Must downcast to a [`Factory`] or a [`Blueprint`]
    Callable(Box<dyn Any + Send + Sync>),
    /// A value built outside the container, always registered as a singleton
    Instance(Instance),
}

/// A registration request: provider plus scope and explicit arguments.
///
/// ```rust
/// use wirebox::{Args, Container, Factory, Register, ServiceKey};
///
/// struct Greeter { greeting: std::sync::Arc<&'static str> }
///
/// let container = Container::new();
/// container
///     .register(
///         ServiceKey::of::<Greeter>(),
///         Register::factory(
///             Factory::new(|args: &mut Args| Ok(Greeter { greeting: args.take("greeting")? })).param("greeting"),
///         )
///         .singleton()
///         .arg("greeting", "hello"),
///     )
///     .unwrap();
/// ```
pub struct Register {
    provider: Provider,
    scope: Scope,
    args: Args,
}

impl Register {
    #[inline]
    #[must_use]
    pub fn itself() -> Self {
        Self::from_provider(Provider::Itself)
    }

    #[inline]
    #[must_use]
    pub fn factory(factory: Factory) -> Self {
        Self::callable(Box::new(factory))
    }

    #[inline]
    #[must_use]
    pub fn blueprint<T: Injectable>() -> Self {
        Self::callable(Box::new(T::blueprint()))
    }

    #[inline]
    #[must_use]
    pub fn callable(payload: Box<dyn Any + Send + Sync>) -> Self {
        Self::from_provider(Provider::Callable(payload))
    }

    #[inline]
    #[must_use]
    pub fn instance<T: Send + Sync + 'static>(value: T) -> Self {
        Self::instance_value(Arc::new(value))
    }

    #[inline]
    #[must_use]
    pub fn instance_value(value: Instance) -> Self {
        Self::from_provider(Provider::Instance(value))
    }

    #[inline]
    fn from_provider(provider: Provider) -> Self {
        Self {
            provider,
            scope: Scope::default(),
            args: Args::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    #[inline]
    #[must_use]
    pub fn singleton(self) -> Self {
        self.scope(Scope::Singleton)
    }

    /// Attaches an explicit argument. Explicit arguments bypass needs
    /// resolution and win over resolved values for the same parameter name.
    #[inline]
    #[must_use]
    pub fn arg<T: Send + Sync + 'static>(mut self, name: &'static str, value: T) -> Self {
        self.args.insert(name, value);
        self
    }
}

/// Append-only mapping from service key to its ordered alternative list.
pub(crate) struct Registry {
    registrations: BTreeMap<ServiceKey, Vec<Arc<Registration>>>,
    extractor: Box<dyn NeedsExtractor>,
}

impl Registry {
    #[must_use]
    pub(crate) fn new(extractor: Box<dyn NeedsExtractor>) -> Self {
        Self {
            registrations: BTreeMap::new(),
            extractor,
        }
    }

    /// Validates the request shape and appends a registration for `service`.
    ///
    /// # Errors
    /// - Returns [`RegistryErrorKind::FactoryNotCallable`] if a callable payload
    ///   is neither a [`Factory`] nor a [`Blueprint`]
    /// - Returns [`RegistryErrorKind::NotConstructible`] if a self-registered
    ///   service key doesn't identify a constructible type
    pub(crate) fn register(&mut self, service: ServiceKey, request: Register) -> Result<(), RegistryErrorKind> {
        let Register { provider, scope, args } = request;

        match provider {
            Provider::Instance(value) => self.register_instance(service, value),
            Provider::Callable(payload) => {
                let factory = match payload.downcast::<Factory>() {
                    Ok(factory) => *factory,
                    Err(payload) => match payload.downcast::<Blueprint>() {
                        Ok(blueprint) => blueprint.factory,
                        Err(_) => return Err(RegistryErrorKind::FactoryNotCallable(service)),
                    },
                };
                self.append(Registration {
                    service,
                    scope,
                    factory,
                    args,
                });
            }
            Provider::Itself => {
                let Some(blueprint) = self.extractor.extract(&service) else {
                    return Err(RegistryErrorKind::NotConstructible(service));
                };
                self.append(Registration {
                    service,
                    scope,
                    factory: blueprint.factory,
                    args,
                });
            }
        }

        Ok(())
    }

    /// Instance registrations are always singletons with no needs
    pub(crate) fn register_instance(&mut self, service: ServiceKey, value: Instance) {
        self.append(Registration {
            service,
            scope: Scope::Singleton,
            factory: instance(value),
            args: Args::new(),
        });
    }

    fn append(&mut self, registration: Registration) {
        let service = registration.service;
        self.registrations.entry(service).or_default().push(Arc::new(registration));
        debug!(%service, "Registered");
    }

    /// Full alternative list for `service` in registration order, cloned so a
    /// resolution context can consume it without touching the registry
    #[must_use]
    pub(crate) fn registrations_for(&self, service: &ServiceKey) -> Vec<Arc<Registration>> {
        self.registrations.get(service).cloned().unwrap_or_default()
    }

    #[must_use]
    pub(crate) fn build_context(&self, service: ServiceKey) -> ResolutionContext {
        ResolutionContext::new(service, self.registrations_for(&service))
    }

    /// Ensures `context` has a resolution target for `service`,
    /// snapshotting the current alternative list on first visit
    pub(crate) fn fill_context(&self, service: ServiceKey, context: &mut ResolutionContext) {
        if !context.has_target(&service) {
            context.add_target(service, self.registrations_for(&service));
        }
    }
}
