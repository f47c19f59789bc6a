use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::clients::OrderClient;
use crate::domain::{Order, OrderStatus};
use crate::order_actor::OrderError;
use crate::realtime::{subscribe_with, ChangeEvent, ChangeFilter, ChangeKind, SubscriptionHandle};

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    /// Newest first.
    pub orders: Vec<Order>,
    /// Orders inserted since mount or the last acknowledgement.
    pub new_orders: usize,
}

impl BoardState {
    fn apply(&mut self, event: ChangeEvent<Order>) -> bool {
        match event.kind {
            ChangeKind::Insert => {
                let Some(order) = event.new else { return false };
                if self.orders.iter().any(|existing| existing.id == order.id) {
                    return false;
                }
                info!(order_id = %order.id, "New order on board");
                self.orders.insert(0, order);
                self.new_orders += 1;
                true
            }
            ChangeKind::Update => {
                let Some(order) = event.new else { return false };
                match self.orders.iter_mut().find(|existing| existing.id == order.id) {
                    Some(existing) => *existing = order,
                    None => self.orders.insert(0, order),
                }
                true
            }
            ChangeKind::Delete => {
                let Some(order) = event.old else { return false };
                let before = self.orders.len();
                self.orders.retain(|existing| existing.id != order.id);
                self.orders.len() != before
            }
        }
    }
}

/// Admin order list, live.
///
/// The subscription task owns the state sender; the board only reads it and
/// reaches the sender weakly to acknowledge. When the orders stream closes the
/// sender goes away with the task and waiters get an error.
pub struct AdminOrderBoard {
    state: watch::Receiver<BoardState>,
    control: Weak<watch::Sender<BoardState>>,
    _subscription: SubscriptionHandle,
}

impl AdminOrderBoard {
    #[instrument(skip(client))]
    pub async fn mount(client: &OrderClient) -> Result<Self, OrderError> {
        let stream = client.subscribe_orders(ChangeFilter::all());

        let mut orders = client.list_orders().await?;
        orders.reverse();
        info!(orders = orders.len(), "Admin order board mounted");

        let feed = Arc::new(watch::Sender::new(BoardState { orders, new_orders: 0 }));
        let state = feed.subscribe();
        let control = Arc::downgrade(&feed);
        let subscription = subscribe_with(stream, move |event| {
            debug!(kind = ?event.kind, "Order change received");
            feed.send_if_modified(|board| board.apply(event));
        });

        Ok(Self { state, control, _subscription: subscription })
    }

    pub fn orders(&self) -> Vec<Order> {
        self.state.borrow().orders.clone()
    }

    pub fn new_orders(&self) -> usize {
        self.state.borrow().new_orders
    }

    pub fn by_status(&self, status: OrderStatus) -> Vec<Order> {
        self.state.borrow().orders.iter().filter(|order| order.status == status).cloned().collect()
    }

    /// Every status with its order count, zero counts included.
    pub fn status_counts(&self) -> BTreeMap<OrderStatus, usize> {
        let board = self.state.borrow();
        let mut counts: BTreeMap<OrderStatus, usize> = OrderStatus::ALL.into_iter().map(|status| (status, 0)).collect();
        for order in &board.orders {
            *counts.entry(order.status).or_default() += 1;
        }
        counts
    }

    /// Clear the new-order counter.
    pub fn acknowledge_new(&self) {
        if let Some(feed) = self.control.upgrade() {
            feed.send_modify(|board| board.new_orders = 0);
        }
    }

    /// Resolve with the board once `ready` holds.
    pub async fn wait_until(&self, ready: impl FnMut(&BoardState) -> bool) -> Result<BoardState, OrderError> {
        let mut state = self.state.clone();
        let board = state
            .wait_for(ready)
            .await
            .map_err(|_| OrderError::ActorCommunicationError("Admin board stopped".to_string()))?;
        Ok(board.clone())
    }
}
