use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{round_cents, DeliveryZone};

/// Lifecycle tag of an order. Any status can be set from any other; only
/// re-selecting the current one is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Delivering,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Delivering,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Badge text shown next to an order.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Delivering => "Out for delivery",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Statuses an admin may pick while the order is in `self`.
    pub fn selectable(self) -> impl Iterator<Item = OrderStatus> {
        Self::ALL.into_iter().filter(move |status| *status != self)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ordered dish, priced at the moment of checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product id.
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customizations: Vec<String>,
}

impl LineItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Customer contact details copied into the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Delivery zone as it was when the order was placed. Later zone edits do not
/// reach existing orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverySnapshot {
    pub zone_id: String,
    pub zone_name: String,
    pub fee: f64,
    pub estimated_time: String,
}

impl From<&DeliveryZone> for DeliverySnapshot {
    fn from(zone: &DeliveryZone) -> Self {
        Self {
            zone_id: zone.id.clone(),
            zone_name: zone.name.clone(),
            fee: zone.fee,
            estimated_time: zone.estimated_time.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Absent for guest checkouts.
    pub user_id: Option<String>,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method_id: String,
    pub customer: CustomerSnapshot,
    pub delivery: DeliverySnapshot,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn contains_product(&self, product_id: &str) -> bool {
        self.items.iter().any(|item| item.id == product_id)
    }

    /// Short reference used in customer-facing messages.
    pub fn reference(&self) -> String {
        format!("#{}", self.id.trim_start_matches("order_"))
    }
}

/// Params for inserting an order. Money totals are derived on insert.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: Option<String>,
    pub items: Vec<LineItem>,
    pub customer: CustomerSnapshot,
    pub delivery: DeliverySnapshot,
    pub payment_method_id: String,
    pub notes: Option<String>,
}

impl OrderCreate {
    pub fn subtotal(&self) -> f64 {
        round_cents(self.items.iter().map(LineItem::line_total).sum())
    }
}
