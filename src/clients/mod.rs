//! Typed clients per domain. Each wraps one or more `ResourceClient`s and
//! adds the orchestration that spans tables.

#[macro_use]
pub mod macros;
pub mod audit_client;
pub mod event_client;
pub mod menu_client;
pub mod notification_client;
pub mod order_client;
pub mod promotion_client;
pub mod review_client;
pub mod settings_client;
pub mod zone_client;

pub use audit_client::AuditClient;
pub use event_client::EventClient;
pub use menu_client::MenuClient;
pub use notification_client::NotificationClient;
pub use order_client::OrderClient;
pub use promotion_client::PromotionClient;
pub use review_client::ReviewClient;
pub use settings_client::SettingsClient;
pub use zone_client::ZoneClient;
