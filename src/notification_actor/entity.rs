use chrono::Utc;

use super::actions::{NotificationAction, NotificationActionResult};
use crate::actor_framework::Entity;
use crate::domain::{Notification, NotificationCreate};

/// Append-only; the read flag is the only thing that changes.
impl Entity for Notification {
    type Id = String;
    type CreateParams = NotificationCreate;
    type Patch = ();
    type Action = NotificationAction;
    type ActionResult = NotificationActionResult;

    const TABLE: &'static str = "notifications";

    fn id(&self) -> &String { &self.id }

    fn from_create_params(id: String, params: NotificationCreate) -> Result<Self, String> {
        if params.title.trim().is_empty() {
            return Err("Notification title is required".to_string());
        }
        Ok(Self {
            id,
            audience: params.audience,
            title: params.title,
            message: params.message,
            category: params.category,
            read: false,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Notifications can only be marked read".to_string())
    }

    fn on_delete(&self) -> Result<(), String> {
        Err("Notifications cannot be deleted".to_string())
    }

    fn handle_action(&mut self, action: NotificationAction) -> Result<NotificationActionResult, String> {
        match action {
            NotificationAction::MarkRead => {
                let was_unread = !self.read;
                self.read = true;
                Ok(NotificationActionResult::MarkedRead(was_unread))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_read_reports_previous_state() {
        let params = NotificationCreate::for_admins("new_order", "New order", "Order #1 received");
        let mut notification = Notification::from_create_params("notification_1".into(), params).unwrap();
        assert!(!notification.read);
        assert_eq!(
            notification.handle_action(NotificationAction::MarkRead).unwrap(),
            NotificationActionResult::MarkedRead(true)
        );
        assert_eq!(
            notification.handle_action(NotificationAction::MarkRead).unwrap(),
            NotificationActionResult::MarkedRead(false)
        );
    }
}
