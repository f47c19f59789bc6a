use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PromotionError {
    #[error("Promotion not found: {0}")]
    NotFound(String),
    #[error("Promotion validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

crate::impl_framework_error!(PromotionError);
