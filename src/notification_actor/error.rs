use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(String),
    #[error("Notification validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

crate::impl_framework_error!(NotificationError);
