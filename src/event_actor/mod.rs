//! Catering enquiries and the invoices issued against them.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
