//! Order rows: creation-time pricing and the status/payment actions.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
