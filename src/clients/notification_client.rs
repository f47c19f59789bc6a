use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{Audience, Notification, NotificationCreate};
use crate::notification_actor::{NotificationAction, NotificationActionResult, NotificationError};

/// Client for the notifications table.
#[derive(Clone)]
pub struct NotificationClient {
    inner: ResourceClient<Notification>,
}

crate::impl_basic_client!(NotificationClient, Notification, NotificationError, notification, notifications);

impl NotificationClient {
    #[instrument(skip(self, params), fields(category = %params.category))]
    pub async fn notify(&self, params: NotificationCreate) -> Result<Notification, NotificationError> {
        debug!("Sending request");
        let notification = self.inner.create(params).await?;
        info!(notification_id = %notification.id, "Notification created");
        Ok(notification)
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn for_audience(&self, audience: Audience) -> Result<Vec<Notification>, NotificationError> {
        debug!("Sending request");
        let mut notifications = self
            .inner
            .list_where(move |notification: &Notification| notification.audience == audience)
            .await?;
        notifications.reverse();
        Ok(notifications)
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self, audience: Audience) -> Result<usize, NotificationError> {
        debug!("Sending request");
        let unread = self
            .inner
            .list_where(move |notification: &Notification| notification.audience == audience && !notification.read)
            .await?;
        Ok(unread.len())
    }

    /// Returns whether the notification was unread.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: String) -> Result<bool, NotificationError> {
        debug!("Sending request");
        match self.inner.perform_action(id, NotificationAction::MarkRead).await? {
            NotificationActionResult::MarkedRead(was_unread) => Ok(was_unread),
        }
    }

    /// Mark every unread notification of `audience` read. Returns how many flipped.
    ///
    /// Rows are marked one by one; a failure stops the sweep and leaves the
    /// rest unread.
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, audience: Audience) -> Result<usize, NotificationError> {
        debug!("Sending request");
        let unread = self
            .inner
            .list_where(move |notification: &Notification| notification.audience == audience && !notification.read)
            .await?;

        let mut flipped = 0;
        for notification in unread {
            match self.mark_read(notification.id.clone()).await {
                Ok(true) => flipped += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(notification_id = %notification.id, error = %e, "Failed to mark notification read");
                    return Err(e);
                }
            }
        }

        info!(flipped, "Notifications marked read");
        Ok(flipped)
    }
}
