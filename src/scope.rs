/// Lifetime of an instance produced by a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Scope {
    /// A new instance for every resolution
    #[default]
    Transient,
    /// One instance for the whole container lifetime, cached after the first build
    Singleton,
}

impl Scope {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Scope::Transient => "transient",
            Scope::Singleton => "singleton",
        }
    }
}
