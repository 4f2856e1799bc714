use alloc::{collections::BTreeMap, sync::Arc, vec::Vec};

use crate::{args::Instance, key::ServiceKey, registry::Registration};

/// Per-context working copy of one key's alternative list.
///
/// Alternatives are consumed from the end, so the most recently registered
/// implementation is tried first.
pub(crate) struct ResolutionTarget {
    service: ServiceKey,
    remaining: Vec<Arc<Registration>>,
}

impl ResolutionTarget {
    #[inline]
    #[must_use]
    pub(crate) fn new(service: ServiceKey, remaining: Vec<Arc<Registration>>) -> Self {
        Self { service, remaining }
    }

    #[inline]
    pub(crate) fn next_impl(&mut self) -> Option<Arc<Registration>> {
        self.remaining.pop()
    }

    /// Takes every remaining alternative at once, leaving the target empty
    #[inline]
    pub(crate) fn drain(&mut self) -> Vec<Arc<Registration>> {
        core::mem::take(&mut self.remaining)
    }

    #[inline]
    #[must_use]
    pub(crate) fn collection_element(&self) -> Option<ServiceKey> {
        self.service.collection_element()
    }

    #[inline]
    #[must_use]
    pub(crate) fn remaining(&self) -> &[Arc<Registration>] {
        &self.remaining
    }
}

/// Scratchpad for one top-level resolve call: the per-key alternative stacks
/// plus the instance cache that makes diamond dependencies share one instance
/// within the call, independent of scope.
pub(crate) struct ResolutionContext {
    targets: BTreeMap<ServiceKey, ResolutionTarget>,
    cache: BTreeMap<ServiceKey, Instance>,
}

impl ResolutionContext {
    #[must_use]
    pub(crate) fn new(service: ServiceKey, registrations: Vec<Arc<Registration>>) -> Self {
        let mut targets = BTreeMap::new();
        targets.insert(service, ResolutionTarget::new(service, registrations));
        Self {
            targets,
            cache: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn has_target(&self, service: &ServiceKey) -> bool {
        self.targets.contains_key(service)
    }

    #[inline]
    pub(crate) fn add_target(&mut self, service: ServiceKey, registrations: Vec<Arc<Registration>>) {
        self.targets.insert(service, ResolutionTarget::new(service, registrations));
    }

    #[inline]
    #[must_use]
    pub(crate) fn target_mut(&mut self, service: &ServiceKey) -> Option<&mut ResolutionTarget> {
        self.targets.get_mut(service)
    }

    #[inline]
    #[must_use]
    pub(crate) fn target(&self, service: &ServiceKey) -> Option<&ResolutionTarget> {
        self.targets.get(service)
    }

    #[inline]
    #[must_use]
    pub(crate) fn cached(&self, service: &ServiceKey) -> Option<Instance> {
        self.cache.get(service).cloned()
    }

    #[inline]
    pub(crate) fn cache(&mut self, service: ServiceKey, instance: Instance) {
        self.cache.insert(service, instance);
    }

    /// The untouched alternative list of the root target, in registration order
    #[must_use]
    pub(crate) fn all_registrations(&self, service: &ServiceKey) -> Vec<Arc<Registration>> {
        self.targets
            .get(service)
            .map(|target| target.remaining().to_vec())
            .unwrap_or_default()
    }
}
