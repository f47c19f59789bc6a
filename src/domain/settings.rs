use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Settings live in a single row with this id.
pub const COMPANY_SETTINGS_ID: &str = "company";

/// A way to pay, shown to the customer as static instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
    pub instructions: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySettings {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub currency: String,
    pub payment_methods: Vec<PaymentMethod>,
    pub updated_at: DateTime<Utc>,
}

impl CompanySettings {
    pub fn payment_method(&self, id: &str) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|method| method.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySettingsCreate {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_payment_methods")]
    pub payment_methods: Vec<PaymentMethod>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_payment_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod {
            id: "cash".to_string(),
            name: "Cash on delivery".to_string(),
            instructions: "Pay the driver in cash when your order arrives.".to_string(),
            active: true,
        },
        PaymentMethod {
            id: "bank_transfer".to_string(),
            name: "Bank transfer".to_string(),
            instructions: "Transfer the total quoting your order number.".to_string(),
            active: true,
        },
    ]
}

impl Default for CompanySettingsCreate {
    fn default() -> Self {
        Self {
            name: "Restaurant".to_string(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            currency: default_currency(),
            payment_methods: default_payment_methods(),
        }
    }
}
