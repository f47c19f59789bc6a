//! In-process restaurant ordering backend: one actor per table, typed
//! clients on top, change streams feeding the live surfaces.

pub mod actor_framework;
pub mod app_system;
pub mod clients;
pub mod domain;
pub mod realtime;
pub mod storefront;
pub mod surfaces;

pub mod audit_actor;
pub mod event_actor;
pub mod menu_actor;
pub mod notification_actor;
pub mod order_actor;
pub mod promotion_actor;
pub mod review_actor;
pub mod settings_actor;
pub mod zone_actor;

#[cfg(test)]
mod mock_framework;
