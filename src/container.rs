use alloc::{boxed::Box, sync::Arc, vec::Vec};
use parking_lot::Mutex;
use tracing::{debug, error, info_span};

use crate::{
    args::{Args, Instance},
    cache::SingletonCache,
    context::ResolutionContext,
    errors::{RegistryErrorKind, ResolveErrorKind},
    extractor::{Catalog, NeedsExtractor},
    key::ServiceKey,
    registry::{Register, Registration, Registry},
    scope::Scope,
};

/// Provides dependency registration and resolution.
///
/// Cloning the container clones a handle: all handles share one registry and
/// one singleton cache. Resolution itself is a plain recursive call tree with
/// no suspension points; callers that register and resolve from several
/// threads are expected to serialize access themselves.
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    pub(crate) registry: Mutex<Registry>,
    pub(crate) singletons: Mutex<SingletonCache>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates a container with an empty [`Catalog`] as its needs extractor
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_extractor(Catalog::new())
    }

    /// Creates a container with the given needs extractor for concrete
    /// self-registrations
    #[must_use]
    pub fn with_extractor(extractor: impl NeedsExtractor) -> Self {
        let container = Self {
            inner: Arc::new(ContainerInner {
                registry: Mutex::new(Registry::new(Box::new(extractor))),
                singletons: Mutex::new(SingletonCache::new()),
            }),
        };

        // Resolved objects may declare a need for the owning container itself
        container
            .inner
            .registry
            .lock()
            .register_instance(ServiceKey::of::<Container>(), Arc::new(container.clone()));

        container
    }

    /// Registers a dependency into the container, returning it for chaining
    ///
    /// # Errors
    /// - Returns [`RegistryErrorKind::FactoryNotCallable`] if a callable payload
    ///   is neither a [`Factory`](crate::Factory) nor a [`Blueprint`](crate::Blueprint)
    /// - Returns [`RegistryErrorKind::NotConstructible`] if a self-registered
    ///   service key doesn't identify a constructible type
    ///
    /// Whether the registration's own needs are satisfiable isn't checked
    /// here; that surfaces at resolve time.
    pub fn register(&self, service: ServiceKey, request: Register) -> Result<&Self, RegistryErrorKind> {
        self.inner.registry.lock().register(service, request)?;
        Ok(self)
    }

    /// Resolves an instance of `T`
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::MissingDependency`] if no registration chain
    ///   satisfies the service or one of its transitive needs
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the registration chosen for
    ///   the key produces a value of another type
    /// - Returns [`ResolveErrorKind::Instantiate`] if a builder fails
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ResolveErrorKind> {
        self.resolve_with(Args::new())
    }

    /// Resolves an instance of `T` with caller-supplied override arguments.
    ///
    /// Override arguments win over both resolved dependencies and explicit
    /// registration arguments, but only for parameter names the chosen
    /// builder actually declares.
    ///
    /// # Errors
    /// Same as [`Self::resolve`]
    pub fn resolve_with<T: Send + Sync + 'static>(&self, args: Args) -> Result<Arc<T>, ResolveErrorKind> {
        let service = ServiceKey::of::<T>();
        downcast(service, self.resolve_key_with(service, args)?)
    }

    /// Resolves an instance for a service key
    ///
    /// # Errors
    /// Same as [`Self::resolve`], except [`ResolveErrorKind::IncorrectType`]
    pub fn resolve_key(&self, service: ServiceKey) -> Result<Instance, ResolveErrorKind> {
        self.resolve_key_with(service, Args::new())
    }

    /// Resolves an instance for a service key with override arguments
    ///
    /// # Errors
    /// Same as [`Self::resolve_key`]
    pub fn resolve_key_with(&self, service: ServiceKey, args: Args) -> Result<Instance, ResolveErrorKind> {
        let span = info_span!("resolve", service = %service);
        let _guard = span.enter();

        let mut context = self.inner.registry.lock().build_context(service);
        self.resolve_in_context(service, &args, &mut context)
    }

    /// Resolves every registration for `T`, most recently registered first
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::IncorrectType`] if one of the registrations
    ///   produces a value of another type
    /// - Returns [`ResolveErrorKind::MissingDependency`] if a need of one of the
    ///   registrations can't be satisfied; an unregistered key itself is not an
    ///   error and yields an empty sequence
    /// - Returns [`ResolveErrorKind::Instantiate`] if a builder fails
    pub fn resolve_all<T: Send + Sync + 'static>(&self) -> Result<Vec<Arc<T>>, ResolveErrorKind> {
        self.resolve_all_with(Args::new())
    }

    /// Resolves every registration for `T` with override arguments
    ///
    /// # Errors
    /// Same as [`Self::resolve_all`]
    pub fn resolve_all_with<T: Send + Sync + 'static>(&self, args: Args) -> Result<Vec<Arc<T>>, ResolveErrorKind> {
        let service = ServiceKey::of::<T>();
        self.resolve_all_key_with(service, args)?
            .into_iter()
            .map(|instance| downcast(service, instance))
            .collect()
    }

    /// Resolves every registration for a service key, most recently registered first
    ///
    /// # Errors
    /// Same as [`Self::resolve_all`], except [`ResolveErrorKind::IncorrectType`]
    pub fn resolve_all_key(&self, service: ServiceKey) -> Result<Vec<Instance>, ResolveErrorKind> {
        self.resolve_all_key_with(service, Args::new())
    }

    /// Resolves every registration for a service key with override arguments
    ///
    /// # Errors
    /// Same as [`Self::resolve_all_key`]
    pub fn resolve_all_key_with(&self, service: ServiceKey, args: Args) -> Result<Vec<Instance>, ResolveErrorKind> {
        let span = info_span!("resolve_all", service = %service);
        let _guard = span.enter();

        self.resolve_all_impl(service, &args)
    }
}

impl Container {
    /// The recursive resolver. Both caches are consulted before any
    /// alternative is consumed: the container-wide singleton cache first,
    /// then the per-call context cache.
    fn resolve_in_context(
        &self,
        service: ServiceKey,
        args: &Args,
        context: &mut ResolutionContext,
    ) -> Result<Instance, ResolveErrorKind> {
        self.inner.registry.lock().fill_context(service, context);

        let singleton = self.inner.singletons.lock().get(&service);
        if let Some(instance) = singleton {
            debug!(%service, "Found in singleton cache");
            return Ok(instance);
        }
        if let Some(instance) = context.cached(&service) {
            debug!(%service, "Found in context cache");
            return Ok(instance);
        }

        let element = context.target(&service).and_then(|target| target.collection_element());
        if let Some(element) = element {
            let instances = self.resolve_collection(element, args, context)?;
            let instance: Instance = Arc::new(instances);
            context.cache(service, instance.clone());
            return Ok(instance);
        }

        let registration = match context.target_mut(&service) {
            Some(target) => target.next_impl(),
            None => None,
        };
        let Some(registration) = registration else {
            let err = ResolveErrorKind::MissingDependency(service);
            error!("{}", err);
            return Err(err);
        };

        // A registration depending on its own key layers over the next
        // alternative down the stack: resolve that one first, so the needs
        // loop below finds it in the context cache. Each recursion consumes
        // one alternative, so the recursion depth is bounded by the number of
        // registrations for the key.
        if registration.needs_itself() {
            self.resolve_in_context(service, args, context)?;
        }

        self.build_in_context(&registration, args, context)
    }

    /// Invokes the registration's builder with the assembled argument set:
    /// resolved needs, then explicit registration args, then override args
    /// filtered to the builder's declared parameters, later sources winning.
    fn build_in_context(
        &self,
        registration: &Registration,
        override_args: &Args,
        context: &mut ResolutionContext,
    ) -> Result<Instance, ResolveErrorKind> {
        let mut assembled = Args::new();
        for (name, need) in registration.factory.needs.iter() {
            if registration.args.contains(name) || override_args.contains(name) {
                continue;
            }
            let value = self.resolve_in_context(need, override_args, context)?;
            assembled.insert_value(name, value);
        }
        for (name, value) in registration.args.iter() {
            assembled.insert_value(name, value.clone());
        }
        for (name, value) in override_args.iter() {
            if registration.factory.declares_param(name) {
                assembled.insert_value(name, value.clone());
            }
        }

        let instance = match registration.factory.call(&mut assembled) {
            Ok(instance) => instance,
            // Builder failures belong to user code and propagate as-is
            Err(err) => {
                error!("{}", err);
                return Err(ResolveErrorKind::Instantiate(err));
            }
        };

        if registration.scope == Scope::Singleton {
            self.inner.singletons.lock().insert(registration.service, instance.clone());
        }
        context.cache(registration.service, instance.clone());
        debug!(service = %registration.service, scope = registration.scope.name(), "Built");

        Ok(instance)
    }

    /// Builds every alternative still remaining for the element key in this
    /// context, most recently registered first. Taking the alternatives out
    /// of the shared target keeps a collection need on a key's own
    /// registrations bounded: the target runs dry instead of starting over.
    fn resolve_collection(
        &self,
        element: ServiceKey,
        args: &Args,
        context: &mut ResolutionContext,
    ) -> Result<Vec<Instance>, ResolveErrorKind> {
        self.inner.registry.lock().fill_context(element, context);

        let registrations = match context.target_mut(&element) {
            Some(target) => target.drain(),
            None => Vec::new(),
        };

        let mut instances = Vec::with_capacity(registrations.len());
        for registration in registrations.iter().rev() {
            instances.push(self.build_in_context(registration, args, context)?);
        }

        Ok(instances)
    }

    /// Builds every registration currently associated with the key, sharing
    /// one context so dependencies are diamond-shared across the fan-out.
    /// An unregistered key yields an empty sequence.
    fn resolve_all_impl(&self, service: ServiceKey, args: &Args) -> Result<Vec<Instance>, ResolveErrorKind> {
        let mut context = self.inner.registry.lock().build_context(service);
        let registrations = context.all_registrations(&service);

        let mut instances = Vec::with_capacity(registrations.len());
        for registration in registrations.iter().rev() {
            instances.push(self.build_in_context(registration, args, &mut context)?);
        }

        Ok(instances)
    }
}

fn downcast<T: Send + Sync + 'static>(service: ServiceKey, instance: Instance) -> Result<Arc<T>, ResolveErrorKind> {
    match instance.downcast::<T>() {
        Ok(value) => Ok(value),
        Err(incorrect_type) => {
            let err = ResolveErrorKind::IncorrectType {
                service,
                actual: (*incorrect_type).type_id(),
            };
            error!("{}", err);
            Err(err)
        }
    }
}
