//! Live views over the change streams. Each surface opens its own
//! subscription when mounted and drops it when unmounted.

pub mod admin_board;
pub mod notification_center;
pub mod order_tracker;

pub use admin_board::*;
pub use notification_center::*;
pub use order_tracker::*;
