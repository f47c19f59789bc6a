use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::clients::OrderClient;
use crate::domain::{Order, OrderStatus};
use crate::order_actor::OrderError;
use crate::realtime::{subscribe_with, ChangeFilter, ChangeKind, SubscriptionHandle};

/// Replace `current` unless `updated` is older than it.
fn apply_update(current: &mut Order, updated: Order) -> bool {
    if updated.updated_at < current.updated_at {
        debug!(status = %updated.status, "Stale order update ignored");
        return false;
    }
    debug!(status = %updated.status, "Order update received");
    *current = updated;
    true
}

/// Customer view of one order, kept current from the orders change stream.
pub struct OrderTracker {
    state: watch::Receiver<Order>,
    _subscription: SubscriptionHandle,
}

impl OrderTracker {
    /// Subscribe to updates of `order_id`, then fetch it.
    ///
    /// Subscribing first means an update landing between the two steps is not lost.
    #[instrument(skip(client))]
    pub async fn mount(client: &OrderClient, order_id: String) -> Result<Self, OrderError> {
        let target = order_id.clone();
        let stream = client.subscribe_orders(ChangeFilter::only(ChangeKind::Update).rows(move |order: &Order| order.id == target));

        let order = client
            .get_order(order_id.clone())
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.clone()))?;
        info!(status = %order.status, "Order tracker mounted");

        let (state_tx, state) = watch::channel(order);
        let subscription = subscribe_with(stream, move |event| {
            let Some(updated) = event.new else { return };
            state_tx.send_if_modified(|current| apply_update(current, updated));
        });

        Ok(Self { state, _subscription: subscription })
    }

    pub fn current(&self) -> Order {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> OrderStatus {
        self.state.borrow().status
    }

    /// Badge text for the current status.
    pub fn status_label(&self) -> &'static str {
        self.status().label()
    }

    /// Resolve once the order reaches `status`.
    pub async fn wait_for_status(&self, status: OrderStatus) -> Result<Order, OrderError> {
        let mut state = self.state.clone();
        let order = state
            .wait_for(|order| order.status == status)
            .await
            .map_err(|_| OrderError::ActorCommunicationError("Order tracker stopped".to_string()))?;
        Ok(order.clone())
    }
}
