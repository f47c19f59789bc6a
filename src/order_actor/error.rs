use thiserror::Error;

use crate::storefront::CheckoutError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
    #[error("Invalid delivery zone: {0}")]
    InvalidZone(String),
    #[error("Invalid payment method: {0}")]
    InvalidPaymentMethod(String),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

crate::impl_framework_error!(OrderError);
