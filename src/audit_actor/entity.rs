use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{SecurityEvent, SecurityEventCreate};

impl Entity for SecurityEvent {
    type Id = String;
    type CreateParams = SecurityEventCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    const TABLE: &'static str = "security_events";

    fn id(&self) -> &String { &self.id }

    fn from_create_params(id: String, params: SecurityEventCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            action: params.action,
            table: params.table,
            entity_id: params.entity_id,
            actor: params.actor,
            details: params.details,
            recorded_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Security events are append-only".to_string())
    }

    fn on_delete(&self) -> Result<(), String> {
        Err("Security events are append-only".to_string())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
