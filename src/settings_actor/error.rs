use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettingsError {
    #[error("Setting not found: {0}")]
    NotFound(String),
    #[error("Payment method unavailable: {0}")]
    PaymentMethodUnavailable(String),
    #[error("Settings validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

crate::impl_framework_error!(SettingsError);
