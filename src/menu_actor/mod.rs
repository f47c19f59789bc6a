//! Menu tables: categories and products.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
