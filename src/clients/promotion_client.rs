use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Promotion, PromotionCreate, PromotionPatch};
use crate::promotion_actor::entity::{code_matches, running_at};
use crate::promotion_actor::{PromotionAction, PromotionActionResult, PromotionError};

#[derive(Clone)]
pub struct PromotionClient {
    inner: ResourceClient<Promotion>,
}

crate::impl_basic_client!(PromotionClient, Promotion, PromotionError, promotion, promotions);
crate::impl_client_delete!(PromotionClient, inner: Promotion, PromotionError, promotion);

impl PromotionClient {
    #[instrument(skip(self, params), fields(title = %params.title))]
    pub async fn create_promotion(&self, params: PromotionCreate) -> Result<Promotion, PromotionError> {
        debug!("Sending request");
        let promotion = self.inner.create(params).await?;
        info!(promotion_id = %promotion.id, "Promotion created");
        Ok(promotion)
    }

    #[instrument(skip(self))]
    pub async fn update_promotion(&self, id: String, patch: PromotionPatch) -> Result<Promotion, PromotionError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn set_active(&self, id: String, active: bool) -> Result<bool, PromotionError> {
        debug!("Sending request");
        match self.inner.perform_action(id, PromotionAction::SetActive(active)).await? {
            PromotionActionResult::ActiveSet(active) => Ok(active),
        }
    }

    /// Promotions shown on the storefront at `now`.
    #[instrument(skip(self))]
    pub async fn active_at(&self, now: DateTime<Utc>) -> Result<Vec<Promotion>, PromotionError> {
        debug!("Sending request");
        let promotions = self.inner.list().await?;
        Ok(running_at(promotions, now))
    }

    /// A running promotion by its code, if one matches.
    #[instrument(skip(self))]
    pub async fn find_by_code(&self, code: String, now: DateTime<Utc>) -> Result<Option<Promotion>, PromotionError> {
        let running = self.active_at(now).await?;
        Ok(running.into_iter().find(|promotion| code_matches(promotion, &code)))
    }
}
