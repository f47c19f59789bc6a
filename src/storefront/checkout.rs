use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::CustomerSnapshot;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Product unavailable: {0}")]
    ProductUnavailable(String),
    #[error("Unknown cart line: {0}")]
    UnknownLine(usize),
}

/// Contact, delivery and payment selections collected at checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub zone_id: String,
    pub payment_method_id: String,
    #[serde(default)]
    pub notes: String,
}

impl CheckoutForm {
    /// Presence checks on every required field, then a shape check on the email.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            ("customer_name", &self.customer_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("zone_id", &self.zone_id),
            ("payment_method_id", &self.payment_method_id),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(CheckoutError::MissingFields(missing));
        }

        if !looks_like_email(self.email.trim()) {
            return Err(CheckoutError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }

    pub fn customer_snapshot(&self) -> CustomerSnapshot {
        CustomerSnapshot {
            name: self.customer_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        }
    }

    pub fn notes(&self) -> Option<String> {
        let notes = self.notes.trim();
        (!notes.is_empty()).then(|| notes.to_string())
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
