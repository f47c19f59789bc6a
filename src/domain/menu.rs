use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub sort_order: Option<i32>,
}

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: Option<String>,
    pub image_url: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive match on name or description. `term` must already be lowercase.
    pub fn matches_term(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term) || self.description.to_lowercase().contains(term)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category_id: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub available: Option<bool>,
}
