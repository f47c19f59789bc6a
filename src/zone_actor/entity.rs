use chrono::Utc;

use super::actions::{ZoneAction, ZoneActionResult};
use crate::actor_framework::Entity;
use crate::domain::{DeliveryZone, DeliveryZoneCreate, DeliveryZonePatch};

fn validate_fee(fee: f64) -> Result<(), String> {
    if fee.is_finite() && fee >= 0.0 {
        Ok(())
    } else {
        Err(format!("Invalid delivery fee: {}", fee))
    }
}

impl Entity for DeliveryZone {
    type Id = String;
    type CreateParams = DeliveryZoneCreate;
    type Patch = DeliveryZonePatch;
    type Action = ZoneAction;
    type ActionResult = ZoneActionResult;

    const TABLE: &'static str = "delivery_zones";

    fn id(&self) -> &String { &self.id }

    fn from_create_params(id: String, params: DeliveryZoneCreate) -> Result<Self, String> {
        if params.name.trim().is_empty() {
            return Err("Zone name is required".to_string());
        }
        validate_fee(params.fee)?;
        Ok(Self {
            id,
            name: params.name.trim().to_string(),
            fee: params.fee,
            estimated_time: params.estimated_time,
            active: params.active,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, patch: DeliveryZonePatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err("Zone name is required".to_string());
            }
            self.name = name.trim().to_string();
        }
        if let Some(fee) = patch.fee {
            validate_fee(fee)?;
            self.fee = fee;
        }
        if let Some(estimated_time) = patch.estimated_time {
            self.estimated_time = estimated_time;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: ZoneAction) -> Result<ZoneActionResult, String> {
        match action {
            ZoneAction::ToggleActive => {
                self.active = !self.active;
                Ok(ZoneActionResult::Toggled(self.active))
            }
        }
    }
}
