use core::any::TypeId;

use super::instantiate::InstantiateErrorKind;
use crate::key::ServiceKey;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Failed to resolve implementation for {0}")]
    MissingDependency(ServiceKey),
    #[error("Incorrect instance type for {service}. Actual: {actual:?}")]
    IncorrectType { service: ServiceKey, actual: TypeId },
    #[error(transparent)]
    Instantiate(InstantiateErrorKind),
}
