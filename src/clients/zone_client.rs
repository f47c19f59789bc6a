use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{DeliveryZone, DeliveryZoneCreate, DeliveryZonePatch};
use crate::zone_actor::{ZoneAction, ZoneActionResult, ZoneError};

/// Client for the delivery_zones table.
#[derive(Clone)]
pub struct ZoneClient {
    inner: ResourceClient<DeliveryZone>,
}

crate::impl_basic_client!(ZoneClient, DeliveryZone, ZoneError, zone, zones);
crate::impl_client_delete!(ZoneClient, inner: DeliveryZone, ZoneError, zone);

impl ZoneClient {
    #[instrument(skip(self, params), fields(zone_name = %params.name))]
    pub async fn create_zone(&self, params: DeliveryZoneCreate) -> Result<DeliveryZone, ZoneError> {
        debug!("Sending request");
        let zone = self.inner.create(params).await?;
        info!(zone_id = %zone.id, "Delivery zone created");
        Ok(zone)
    }

    #[instrument(skip(self))]
    pub async fn update_zone(&self, id: String, patch: DeliveryZonePatch) -> Result<DeliveryZone, ZoneError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?)
    }

    /// Flip the active flag and return the new value.
    #[instrument(skip(self))]
    pub async fn toggle_active(&self, id: String) -> Result<bool, ZoneError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ZoneAction::ToggleActive).await? {
            ZoneActionResult::Toggled(active) => {
                info!(active, "Delivery zone toggled");
                Ok(active)
            }
        }
    }

    /// Zones offered at checkout, by name.
    #[instrument(skip(self))]
    pub async fn active_zones(&self) -> Result<Vec<DeliveryZone>, ZoneError> {
        debug!("Sending request");
        let mut zones = self.inner.list_where(|zone: &DeliveryZone| zone.active).await?;
        zones.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(zones)
    }
}
