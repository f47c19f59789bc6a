//! System orchestration, startup, and shutdown logic.

pub mod config;
pub mod restaurant_system;
pub mod telemetry;

pub use config::*;
pub use restaurant_system::*;
pub use telemetry::*;
