use alloc::{collections::BTreeMap, sync::Arc, vec::Vec};
use core::any::Any;

use crate::errors::InstantiateErrorKind;

/// A built service instance, dynamically typed.
///
/// A resolved collection key carries its instances as an `Arc<Vec<Instance>>`.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Named arguments keyed by builder parameter name.
///
/// The same shape serves three roles: explicit arguments attached to a
/// registration, override arguments supplied to a resolve call, and the
/// assembled argument set a builder is invoked with.
#[derive(Default, Clone)]
pub struct Args {
    map: BTreeMap<&'static str, Instance>,
}

impl Args {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { map: BTreeMap::new() }
    }

    #[inline]
    #[must_use]
    pub fn with<T: Send + Sync + 'static>(mut self, name: &'static str, value: T) -> Self {
        self.insert(name, value);
        self
    }

    #[inline]
    pub fn insert<T: Send + Sync + 'static>(&mut self, name: &'static str, value: T) -> Option<Instance> {
        self.map.insert(name, Arc::new(value))
    }

    #[inline]
    pub fn insert_value(&mut self, name: &'static str, value: Instance) -> Option<Instance> {
        self.map.insert(name, value)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.map.get(name).and_then(|value| value.clone().downcast().ok())
    }

    /// Removes the named argument, downcasting it to the requested type
    ///
    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if the argument isn't present
    /// - Returns [`InstantiateErrorKind::ArgumentType`] if the argument has another type
    pub fn take<T: Send + Sync + 'static>(&mut self, name: &'static str) -> Result<Arc<T>, InstantiateErrorKind> {
        self.take_value(name)?
            .downcast()
            .map_err(|_| InstantiateErrorKind::ArgumentType { name })
    }

    /// Removes the named argument without downcasting
    ///
    /// # Errors
    /// Returns [`InstantiateErrorKind::MissingArgument`] if the argument isn't present
    pub fn take_value(&mut self, name: &'static str) -> Result<Instance, InstantiateErrorKind> {
        self.map
            .remove(name)
            .ok_or(InstantiateErrorKind::MissingArgument { name })
    }

    /// Removes an argument resolved from a collection key, downcasting every element
    ///
    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if the argument isn't present
    /// - Returns [`InstantiateErrorKind::ArgumentType`] if the argument isn't a sequence
    ///   or one of its elements has another type
    pub fn take_all<T: Send + Sync + 'static>(&mut self, name: &'static str) -> Result<Vec<Arc<T>>, InstantiateErrorKind> {
        let instances: Arc<Vec<Instance>> = self
            .take_value(name)?
            .downcast()
            .map_err(|_| InstantiateErrorKind::ArgumentType { name })?;
        instances
            .iter()
            .map(|instance| {
                instance
                    .clone()
                    .downcast()
                    .map_err(|_| InstantiateErrorKind::ArgumentType { name })
            })
            .collect()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Instance)> {
        self.map.iter().map(|(name, value)| (*name, value))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{Args, Instance};
    use crate::errors::InstantiateErrorKind;

    use alloc::{sync::Arc, vec::Vec};

    #[test]
    fn test_insert_and_take() {
        let mut args = Args::new().with("port", 8080_u16).with("host", "localhost");

        assert!(args.contains("port"));
        assert_eq!(args.len(), 2);
        assert_eq!(*args.take::<u16>("port").unwrap(), 8080);
        assert!(!args.contains("port"));
        assert_eq!(*args.get::<&str>("host").unwrap(), "localhost");
    }

    #[test]
    fn test_take_missing() {
        let mut args = Args::new();
        assert!(matches!(
            args.take::<u16>("port"),
            Err(InstantiateErrorKind::MissingArgument { name: "port" }),
        ));
    }

    #[test]
    fn test_take_incorrect_type() {
        let mut args = Args::new().with("port", 8080_u16);
        assert!(matches!(
            args.take::<u32>("port"),
            Err(InstantiateErrorKind::ArgumentType { name: "port" }),
        ));
    }

    #[test]
    fn test_take_all() {
        let instances: Vec<Instance> = [1_i32, 2, 3].map(|val| Arc::new(val) as Instance).into();
        let mut args = Args::new().with("handlers", instances);

        let handlers = args.take_all::<i32>("handlers").unwrap();
        assert_eq!(handlers.iter().map(|val| **val).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn test_take_all_not_a_sequence() {
        let mut args = Args::new().with("handlers", 1_i32);
        assert!(matches!(
            args.take_all::<i32>("handlers"),
            Err(InstantiateErrorKind::ArgumentType { name: "handlers" }),
        ));
    }
}
