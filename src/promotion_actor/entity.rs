use chrono::{DateTime, Utc};

use super::actions::{PromotionAction, PromotionActionResult};
use crate::actor_framework::Entity;
use crate::domain::{Promotion, PromotionCreate, PromotionPatch};

fn validate(promotion: &Promotion) -> Result<(), String> {
    if promotion.title.trim().is_empty() {
        return Err("Promotion title is required".to_string());
    }
    if !(promotion.discount_percent > 0.0 && promotion.discount_percent <= 100.0) {
        return Err(format!("Discount must be in (0, 100], got {}", promotion.discount_percent));
    }
    if let (Some(start), Some(end)) = (promotion.starts_at, promotion.ends_at) {
        if end <= start {
            return Err("Promotion must end after it starts".to_string());
        }
    }
    Ok(())
}

fn normalize_code(code: Option<String>) -> Option<String> {
    code.map(|code| code.trim().to_uppercase()).filter(|code| !code.is_empty())
}

impl Entity for Promotion {
    type Id = String;
    type CreateParams = PromotionCreate;
    type Patch = PromotionPatch;
    type Action = PromotionAction;
    type ActionResult = PromotionActionResult;

    const TABLE: &'static str = "promotions";

    fn id(&self) -> &String { &self.id }

    fn from_create_params(id: String, params: PromotionCreate) -> Result<Self, String> {
        let promotion = Self {
            id,
            title: params.title,
            description: params.description,
            code: normalize_code(params.code),
            discount_percent: params.discount_percent,
            starts_at: params.starts_at,
            ends_at: params.ends_at,
            active: params.active,
            created_at: Utc::now(),
        };
        validate(&promotion)?;
        Ok(promotion)
    }

    /// Applies the patch, then re-validates the whole row.
    fn on_update(&mut self, patch: PromotionPatch) -> Result<(), String> {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(code) = patch.code {
            self.code = normalize_code(code);
        }
        if let Some(discount_percent) = patch.discount_percent {
            self.discount_percent = discount_percent;
        }
        if let Some(starts_at) = patch.starts_at {
            self.starts_at = starts_at;
        }
        if let Some(ends_at) = patch.ends_at {
            self.ends_at = ends_at;
        }
        validate(self)
    }

    fn handle_action(&mut self, action: PromotionAction) -> Result<PromotionActionResult, String> {
        match action {
            PromotionAction::SetActive(active) => {
                self.active = active;
                Ok(PromotionActionResult::ActiveSet(active))
            }
        }
    }
}

/// Whether `code` names this promotion, ignoring case and surrounding blanks.
pub fn code_matches(promotion: &Promotion, code: &str) -> bool {
    promotion.code.as_deref() == Some(code.trim().to_uppercase().as_str())
}

/// Running promotions at `now`, in insertion order.
pub fn running_at(promotions: Vec<Promotion>, now: DateTime<Utc>) -> Vec<Promotion> {
    promotions.into_iter().filter(|promotion| promotion.is_running(now)).collect()
}
