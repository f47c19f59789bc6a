use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuError {
    #[error("Menu item not found: {0}")]
    NotFound(String),
    #[error("Menu validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

crate::impl_framework_error!(MenuError);
