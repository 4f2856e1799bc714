use core::{
    any::{type_name, TypeId},
    cmp::Ordering,
    fmt::{self, Display, Formatter},
};

/// Identity of an abstract contract a registration can satisfy.
///
/// Keys come in three shapes: a type identity, a caller-supplied name
/// (the deferred/forward-declared form, resolved by the registration layer,
/// never by the engine), and a collection request meaning "every registered
/// implementation of the element type".
#[derive(Debug, Clone, Copy)]
pub struct ServiceKey {
    name: &'static str,
    id: KeyId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum KeyId {
    Type(TypeId),
    Name(&'static str),
    AllOf(TypeId),
}

impl ServiceKey {
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: type_name::<T>(),
            id: KeyId::Type(TypeId::of::<T>()),
        }
    }

    #[inline]
    #[must_use]
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            id: KeyId::Name(name),
        }
    }

    /// Key requesting every registered implementation of `T` as one sequence
    #[inline]
    #[must_use]
    pub fn all_of<T: ?Sized + 'static>() -> Self {
        Self {
            name: type_name::<T>(),
            id: KeyId::AllOf(TypeId::of::<T>()),
        }
    }

    /// For a collection key, the key of the element type
    #[inline]
    #[must_use]
    pub fn collection_element(&self) -> Option<Self> {
        match self.id {
            KeyId::AllOf(id) => Some(Self {
                name: self.name,
                id: KeyId::Type(id),
            }),
            KeyId::Type(_) | KeyId::Name(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_type(&self) -> bool {
        matches!(self.id, KeyId::Type(_))
    }

    #[inline]
    #[must_use]
    pub(crate) fn short_name(&self) -> &'static str {
        self.name.rsplit_once("::").map_or(self.name, |(_, name)| name)
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceKey {}

impl PartialOrd for ServiceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Display for ServiceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.id {
            KeyId::Type(_) => write!(f, "{}", self.short_name()),
            KeyId::Name(name) => write!(f, "{name}"),
            KeyId::AllOf(_) => write!(f, "all of {}", self.short_name()),
        }
    }
}
