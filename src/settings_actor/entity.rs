use std::collections::HashSet;

use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{CompanySettings, CompanySettingsCreate};

/// Single-row table written through upsert.
impl Entity for CompanySettings {
    type Id = String;
    type CreateParams = CompanySettingsCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    const TABLE: &'static str = "company_settings";

    fn id(&self) -> &String { &self.id }

    fn from_create_params(id: String, params: CompanySettingsCreate) -> Result<Self, String> {
        if params.name.trim().is_empty() {
            return Err("Company name is required".to_string());
        }
        if params.currency.len() != 3 {
            return Err(format!("Currency must be an ISO code, got {}", params.currency));
        }
        {
            let mut seen = HashSet::new();
            if let Some(duplicate) = params.payment_methods.iter().find(|method| !seen.insert(method.id.as_str())) {
                return Err(format!("Duplicate payment method: {}", duplicate.id));
            }
        }
        Ok(Self {
            id,
            name: params.name.trim().to_string(),
            phone: params.phone,
            email: params.email,
            address: params.address,
            currency: params.currency.to_uppercase(),
            payment_methods: params.payment_methods,
            updated_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Company settings are saved with upsert".to_string())
    }

    fn on_delete(&self) -> Result<(), String> {
        Err("Company settings cannot be deleted".to_string())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
