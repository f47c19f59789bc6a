use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::clients::NotificationClient;
use crate::domain::{Audience, Notification};
use crate::notification_actor::NotificationError;
use crate::realtime::{subscribe_with, ChangeFilter, ChangeKind, SubscriptionHandle};

/// Bell menu for one audience: the notifications, newest first, kept live.
pub struct NotificationCenter {
    client: NotificationClient,
    audience: Audience,
    state: watch::Receiver<Vec<Notification>>,
    _subscription: SubscriptionHandle,
}

impl NotificationCenter {
    #[instrument(skip(client))]
    pub async fn mount(client: &NotificationClient, audience: Audience) -> Result<Self, NotificationError> {
        let wanted = audience.clone();
        let stream =
            client.subscribe_notifications(ChangeFilter::all().rows(move |notification: &Notification| notification.audience == wanted));

        let notifications = client.for_audience(audience.clone()).await?;
        info!(count = notifications.len(), "Notification center mounted");

        let (state_tx, state) = watch::channel(notifications);
        let subscription = subscribe_with(stream, move |event| {
            let kind = event.kind;
            state_tx.send_if_modified(|list| match (kind, event.new, event.old) {
                (ChangeKind::Insert, Some(created), _) => {
                    if list.iter().any(|existing| existing.id == created.id) {
                        return false;
                    }
                    debug!(notification_id = %created.id, "Notification received");
                    list.insert(0, created);
                    true
                }
                (ChangeKind::Update, Some(updated), _) => match list.iter_mut().find(|existing| existing.id == updated.id) {
                    Some(existing) => {
                        *existing = updated;
                        true
                    }
                    None => false,
                },
                (ChangeKind::Delete, _, Some(removed)) => {
                    let before = list.len();
                    list.retain(|existing| existing.id != removed.id);
                    list.len() != before
                }
                _ => false,
            });
        });

        Ok(Self {
            client: client.clone(),
            audience,
            state,
            _subscription: subscription,
        })
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.borrow().clone()
    }

    pub fn unread_count(&self) -> usize {
        self.state.borrow().iter().filter(|notification| !notification.read).count()
    }

    /// Mark everything read on the server. The local list catches up from the stream.
    pub async fn mark_all_read(&self) -> Result<usize, NotificationError> {
        self.client.mark_all_read(self.audience.clone()).await
    }

    /// Resolve once the local unread count equals `count`.
    pub async fn wait_for_unread(&self, count: usize) -> Result<usize, NotificationError> {
        let mut state = self.state.clone();
        state
            .wait_for(|list| list.iter().filter(|notification| !notification.read).count() == count)
            .await
            .map_err(|_| NotificationError::ActorCommunicationError("Notification center stopped".to_string()))?;
        Ok(count)
    }
}
