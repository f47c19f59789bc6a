use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EventError {
    #[error("Event record not found: {0}")]
    NotFound(String),
    #[error("Event validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

crate::impl_framework_error!(EventError);
