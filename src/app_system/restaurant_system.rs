use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::config::{load_settings_seed, AppConfig, ConfigError};
use crate::actor_framework::{Entity, ResourceActor, ResourceClient};
use crate::clients::{
    AuditClient, EventClient, MenuClient, NotificationClient, OrderClient, PromotionClient, ReviewClient,
    SettingsClient, ZoneClient,
};
use crate::domain::{
    Category, CompanySettings, DeliveryZone, EventInvoice, EventRequest, Notification, Order, Product, Promotion,
    Review, SecurityEvent,
};

/// `prefix_1`, `prefix_2`, ...
fn sequential_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

/// The application: one actor per table plus the clients wired on top.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct RestaurantSystem {
    pub order_client: OrderClient,
    pub menu_client: MenuClient,
    pub zone_client: ZoneClient,
    pub notification_client: NotificationClient,
    pub review_client: ReviewClient,
    pub promotion_client: PromotionClient,
    pub event_client: EventClient,
    pub settings_client: SettingsClient,
    pub audit_client: AuditClient,
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

struct Spawner<'a> {
    config: &'a AppConfig,
    shutdown: watch::Receiver<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl Spawner<'_> {
    fn table<T: Entity<Id = String>>(&mut self, prefix: &'static str) -> ResourceClient<T> {
        let (actor, client) =
            ResourceActor::<T>::new(self.config.channel_buffer, self.config.change_capacity, sequential_ids(prefix));
        self.handles.push(tokio::spawn(actor.run_until(self.shutdown.clone())));
        client
    }
}

impl RestaurantSystem {
    pub fn new(config: &AppConfig) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let mut spawner = Spawner { config, shutdown: shutdown_rx, handles: Vec::new() };

        // 1. Leaf tables
        let zone_client = ZoneClient::new(spawner.table::<DeliveryZone>("zone"));
        let settings_client = SettingsClient::new(spawner.table::<CompanySettings>("settings"));
        let notification_client = NotificationClient::new(spawner.table::<Notification>("notification"));
        let audit_client = AuditClient::new(spawner.table::<SecurityEvent>("audit"));
        let promotion_client = PromotionClient::new(spawner.table::<Promotion>("promotion"));
        let menu_client = MenuClient::new(spawner.table::<Category>("category"), spawner.table::<Product>("product"));

        // 2. Orders depend on zones, settings, notifications and audit
        let order_client = OrderClient::new(
            spawner.table::<Order>("order"),
            zone_client.clone(),
            settings_client.clone(),
            notification_client.clone(),
            audit_client.clone(),
        );

        // 3. Reviews check purchases through orders
        let review_client = ReviewClient::new(spawner.table::<Review>("review"), order_client.clone());

        let event_client = EventClient::new(
            spawner.table::<EventRequest>("event"),
            spawner.table::<EventInvoice>("invoice"),
            notification_client.clone(),
        );

        info!(tables = spawner.handles.len(), "Restaurant system started");

        Self {
            order_client,
            menu_client,
            zone_client,
            notification_client,
            review_client,
            promotion_client,
            event_client,
            settings_client,
            audit_client,
            shutdown,
            handles: spawner.handles,
        }
    }

    /// Save the company settings seed named by the config, if any.
    pub async fn apply_settings_seed(&self, config: &AppConfig) -> Result<Option<CompanySettings>, ConfigError> {
        let Some(path) = &config.settings_path else {
            return Ok(None);
        };
        let seed = load_settings_seed(path)?;
        let settings = self
            .settings_client
            .save(seed)
            .await
            .map_err(|e| ConfigError::SeedRejected(e.to_string()))?;
        info!(path = %path.display(), "Company settings seeded");
        Ok(Some(settings))
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        // Receivers may already be gone if every actor exited on its own.
        let _ = self.shutdown.send(true);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let next = sequential_ids("order");
        assert_eq!(next(), "order_1");
        assert_eq!(next(), "order_2");
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let system = RestaurantSystem::new(&AppConfig::default());
        let zone_client = system.zone_client.clone();
        system.shutdown().await.unwrap();

        assert!(zone_client.list_zones().await.is_err());
    }

    #[tokio::test]
    async fn test_without_seed_nothing_is_saved() {
        let system = RestaurantSystem::new(&AppConfig::default());
        assert_eq!(system.apply_settings_seed(&AppConfig::default()).await, Ok(None));
        system.shutdown().await.unwrap();
    }
}
