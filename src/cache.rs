use alloc::collections::BTreeMap;

use crate::{args::Instance, key::ServiceKey};

/// Container-lifetime cache of singleton-scoped instances.
///
/// Populated the first time a singleton registration is built, consulted
/// before the per-resolution context cache, never evicted.
#[derive(Default)]
pub(crate) struct SingletonCache {
    map: BTreeMap<ServiceKey, Instance>,
}

impl SingletonCache {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { map: BTreeMap::new() }
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, service: &ServiceKey) -> Option<Instance> {
        self.map.get(service).cloned()
    }

    #[inline]
    pub(crate) fn insert(&mut self, service: ServiceKey, instance: Instance) -> Option<Instance> {
        self.map.insert(service, instance)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::SingletonCache;
    use crate::key::ServiceKey;

    use alloc::sync::Arc;

    struct Engine;

    #[test]
    fn test_insert_and_get() {
        let mut cache = SingletonCache::new();
        let service = ServiceKey::of::<Engine>();

        assert!(cache.get(&service).is_none());
        cache.insert(service, Arc::new(Engine));

        let first = cache.get(&service).unwrap();
        let second = cache.get(&service).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
