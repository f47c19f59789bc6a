use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReviewError {
    #[error("Review not found: {0}")]
    NotFound(String),
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
    #[error("Review validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

crate::impl_framework_error!(ReviewError);
