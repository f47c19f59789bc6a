use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Admin-configured delivery area with a flat fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryZone {
    pub id: String,
    pub name: String,
    pub fee: f64,
    /// Free text such as "30-45 min".
    pub estimated_time: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryZoneCreate {
    pub name: String,
    pub fee: f64,
    pub estimated_time: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryZonePatch {
    pub name: Option<String>,
    pub fee: Option<f64>,
    pub estimated_time: Option<String>,
    pub active: Option<bool>,
}
