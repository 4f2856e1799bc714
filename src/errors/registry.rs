use crate::key::ServiceKey;

#[derive(thiserror::Error, Debug)]
pub enum RegistryErrorKind {
    #[error("The service {0} can't be registered as its own implementation")]
    NotConstructible(ServiceKey),
    #[error("Expected a callable factory for the service {0}")]
    FactoryNotCallable(ServiceKey),
}
