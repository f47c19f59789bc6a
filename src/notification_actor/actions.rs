#[derive(Debug, Clone)]
pub enum NotificationAction {
    MarkRead,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationActionResult {
    /// Whether the row was unread before.
    MarkedRead(bool),
}
