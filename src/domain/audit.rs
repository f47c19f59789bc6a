use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only record of a privileged action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub id: String,
    pub action: String,
    pub table: String,
    pub entity_id: String,
    pub actor: Option<String>,
    pub details: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEventCreate {
    pub action: String,
    pub table: String,
    pub entity_id: String,
    pub actor: Option<String>,
    pub details: serde_json::Value,
}

impl SecurityEventCreate {
    pub fn new(
        action: impl Into<String>,
        table: impl Into<String>,
        entity_id: impl Into<String>,
        actor: Option<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            action: action.into(),
            table: table.into(),
            entity_id: entity_id.into(),
            actor,
            details,
        }
    }
}
