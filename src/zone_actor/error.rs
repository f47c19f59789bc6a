use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ZoneError {
    #[error("Delivery zone not found: {0}")]
    NotFound(String),
    #[error("Delivery zone validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

crate::impl_framework_error!(ZoneError);
