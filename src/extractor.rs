use alloc::collections::BTreeMap;

use crate::{factory::Blueprint, key::ServiceKey};

/// Supplies construction plans for concrete self-registrations.
///
/// Given a service key, an extractor returns the [`Blueprint`] describing how
/// to construct that type, or `None` when the key doesn't identify a
/// constructible type. Named and collection keys are legal inputs and simply
/// yield `None` unless the extractor knows better.
pub trait NeedsExtractor: Send + Sync + 'static {
    fn extract(&self, service: &ServiceKey) -> Option<Blueprint>;
}

/// Default [`NeedsExtractor`]: an explicit key to blueprint map.
///
/// There is no runtime reflection to discover constructors, so types opt in
/// through [`Injectable`](crate::Injectable) and get listed here:
///
/// ```rust
/// use wirebox::{Args, Blueprint, Catalog, Container, Factory, Injectable};
///
/// struct FileReader;
///
/// impl Injectable for FileReader {
///     fn blueprint() -> Blueprint {
///         Blueprint::new::<Self>(Factory::new(|_args: &mut Args| Ok(FileReader)))
///     }
/// }
///
/// let container = Container::with_extractor(Catalog::new().with::<FileReader>());
/// ```
#[derive(Default)]
pub struct Catalog {
    blueprints: BTreeMap<ServiceKey, Blueprint>,
}

impl Catalog {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            blueprints: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with<T: crate::Injectable>(mut self) -> Self {
        let blueprint = T::blueprint();
        self.blueprints.insert(blueprint.service(), blueprint);
        self
    }
}

impl NeedsExtractor for Catalog {
    fn extract(&self, service: &ServiceKey) -> Option<Blueprint> {
        self.blueprints.get(service).cloned()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{Catalog, NeedsExtractor};
    use crate::{factory::Blueprint, key::ServiceKey, Factory, Injectable};

    struct FileReader;

    impl Injectable for FileReader {
        fn blueprint() -> Blueprint {
            Blueprint::new::<Self>(Factory::new(|_args| Ok(FileReader)))
        }
    }

    #[test]
    fn test_known_type() {
        let catalog = Catalog::new().with::<FileReader>();
        assert!(catalog.extract(&ServiceKey::of::<FileReader>()).is_some());
    }

    #[test]
    fn test_unknown_keys() {
        let catalog = Catalog::new().with::<FileReader>();

        assert!(catalog.extract(&ServiceKey::of::<i32>()).is_none());
        assert!(catalog.extract(&ServiceKey::named("FileReader")).is_none());
        assert!(catalog.extract(&ServiceKey::all_of::<FileReader>()).is_none());
    }
}
