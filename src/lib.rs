//! Runtime service registry and dependency resolver.
//!
//! Services are identified by a [`ServiceKey`] and registered into a
//! [`Container`] together with the recipe for building them: a [`Factory`]
//! closure, a pre-built instance, or the type's own [`Blueprint`]. Resolving a
//! key walks the declared needs recursively, preferring the most recent
//! registration, sharing instances within one resolve call and caching
//! singleton-scoped services for the container's lifetime.
//!
//! ```rust
//! use wirebox::{Args, Container, Factory, Register, ServiceKey};
//!
//! struct Logger;
//! struct Service { logger: std::sync::Arc<Logger> }
//!
//! let container = Container::new();
//! container
//!     .register(
//!         ServiceKey::of::<Logger>(),
//!         Register::factory(Factory::new(|_args| Ok(Logger))).singleton(),
//!     )
//!     .unwrap()
//!     .register(
//!         ServiceKey::of::<Service>(),
//!         Register::factory(
//!             Factory::new(|args: &mut Args| Ok(Service { logger: args.take("logger")? }))
//!                 .needs::<Logger>("logger"),
//!         ),
//!     )
//!     .unwrap();
//!
//! let service = container.resolve::<Service>().unwrap();
//! let logger = container.resolve::<Logger>().unwrap();
//! assert!(std::sync::Arc::ptr_eq(&service.logger, &logger));
//! ```

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod args;
mod cache;
mod container;
mod context;
mod errors;
mod extractor;
mod factory;
mod key;
mod registry;
mod scope;

pub use args::{Args, Instance};
pub use container::Container;
pub use errors::{InstantiateErrorKind, RegistryErrorKind, ResolveErrorKind};
pub use extractor::{Catalog, NeedsExtractor};
pub use factory::{Blueprint, Factory, Injectable};
pub use key::ServiceKey;
pub use registry::{Provider, Register};
pub use scope::Scope;
