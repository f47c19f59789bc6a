use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: String,
    pub title: String,
    pub description: String,
    pub code: Option<String>,
    pub discount_percent: f64,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Promotion {
    /// Active and inside its (optional) window at `now`.
    pub fn is_running(&self, now: DateTime<Utc>) -> bool {
        self.active
            && self.starts_at.map_or(true, |start| start <= now)
            && self.ends_at.map_or(true, |end| now < end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionCreate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub code: Option<String>,
    pub discount_percent: f64,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromotionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<Option<String>>,
    pub discount_percent: Option<f64>,
    pub starts_at: Option<Option<DateTime<Utc>>>,
    pub ends_at: Option<Option<DateTime<Utc>>>,
}
