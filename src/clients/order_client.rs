use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::actor_framework::{Entity, ResourceClient};
use crate::clients::{AuditClient, NotificationClient, SettingsClient, ZoneClient};
use crate::domain::{
    DeliverySnapshot, NotificationCreate, Order, OrderCreate, OrderStatus, PaymentStatus, SecurityEventCreate,
};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use crate::storefront::{Cart, CheckoutError, CheckoutForm};

/// Client for interacting with the Order actor.
///
/// Checkout resolves the delivery zone and payment method before the order
/// row is written; status changes fan out to the audit log and, for the
/// customer-facing transitions, to the customer's notifications.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    zone_client: ZoneClient,
    settings_client: SettingsClient,
    notification_client: NotificationClient,
    audit_client: AuditClient,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        zone_client: ZoneClient,
        settings_client: SettingsClient,
        notification_client: NotificationClient,
        audit_client: AuditClient,
    ) -> Self {
        Self {
            inner,
            zone_client,
            settings_client,
            notification_client,
            audit_client,
        }
    }

    #[instrument(skip(self, cart, form), fields(zone_id = %form.zone_id, items = cart.item_count()))]
    pub async fn place_order(
        &self,
        user_id: Option<String>,
        cart: &Cart,
        form: &CheckoutForm,
    ) -> Result<Order, OrderError> {
        info!("Processing place_order request (Client Side)");

        // Step 1: Validate cart and form
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart.into());
        }
        form.validate()?;

        // Step 2: Resolve delivery zone
        let zone = match self.zone_client.get_zone(form.zone_id.clone()).await {
            Ok(Some(zone)) if zone.active => {
                info!(zone_name = %zone.name, fee = zone.fee, "Zone validation successful");
                zone
            }
            Ok(Some(_)) => {
                error!("Zone is not active");
                return Err(OrderError::InvalidZone(form.zone_id.clone()));
            }
            Ok(None) => {
                error!("Zone not found");
                return Err(OrderError::InvalidZone(form.zone_id.clone()));
            }
            Err(e) => {
                error!(error = %e, "Zone validation failed");
                return Err(OrderError::InvalidZone(format!("Zone validation failed: {}", e)));
            }
        };

        // Step 3: Resolve payment method
        if let Err(e) = self.settings_client.payment_method(form.payment_method_id.clone()).await {
            error!(error = %e, "Payment method validation failed");
            return Err(OrderError::InvalidPaymentMethod(form.payment_method_id.clone()));
        }

        // Step 4: Create order in ResourceActor
        let payload = OrderCreate {
            user_id,
            items: cart.line_items(),
            customer: form.customer_snapshot(),
            delivery: DeliverySnapshot::from(&zone),
            payment_method_id: form.payment_method_id.clone(),
            notes: form.notes(),
        };
        let order = self.inner.create(payload).await?;
        info!(order_id = %order.id, total = order.total, "Order created");

        // Step 5: Tell the kitchen
        let notice = NotificationCreate::for_admins(
            "new_order",
            "New order",
            format!("Order {} from {} ({:.2})", order.reference(), order.customer.name, order.total),
        );
        if let Err(e) = self.notification_client.notify(notice).await {
            warn!(order_id = %order.id, error = %e, "Failed to notify admins about new order");
        }

        Ok(order)
    }

    /// Move an order to `status` on behalf of `actor`.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: String,
        status: OrderStatus,
        actor: Option<String>,
    ) -> Result<Order, OrderError> {
        let (from, order) = match self.inner.perform_action(order_id.clone(), OrderAction::SetStatus(status)).await {
            Ok(OrderActionResult::StatusChanged { from, order }) => (from, order),
            Ok(other) => {
                return Err(OrderError::ActorCommunicationError(format!("Unexpected result: {:?}", other)));
            }
            Err(e) => {
                error!(error = %e, "Status change failed");
                return Err(e.into());
            }
        };
        info!(%from, to = %status, "Order status changed");

        self.audit_client
            .log_security_event(SecurityEventCreate::new(
                "order_status_changed",
                Order::TABLE,
                order.id.clone(),
                actor,
                json!({ "from": from.as_str(), "to": status.as_str() }),
            ))
            .await;

        if let Some(notice) = status_notice(&order) {
            if let Err(e) = self.notification_client.notify(notice).await {
                warn!(error = %e, "Failed to notify customer about status change");
            }
        }

        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn mark_paid(&self, order_id: String) -> Result<Order, OrderError> {
        let action = OrderAction::SetPaymentStatus(PaymentStatus::Completed);
        match self.inner.perform_action(order_id, action).await? {
            OrderActionResult::PaymentChanged { order, .. } => {
                info!("Order marked paid");
                Ok(order)
            }
            other => Err(OrderError::ActorCommunicationError(format!("Unexpected result: {:?}", other))),
        }
    }

    /// A customer's orders, newest first.
    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: String) -> Result<Vec<Order>, OrderError> {
        let mut orders = self
            .inner
            .list_where(move |order: &Order| order.user_id.as_deref() == Some(user_id.as_str()))
            .await?;
        orders.reverse();
        Ok(orders)
    }

    /// Orders currently in `status`, newest first.
    #[instrument(skip(self))]
    pub async fn orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.inner.list_where(move |order: &Order| order.status == status).await?;
        orders.reverse();
        Ok(orders)
    }
}

crate::impl_client_methods!(OrderClient, inner: Order, OrderError, order, orders);

/// Customer notification for a status the customer hears about, if the
/// order belongs to a signed-in customer.
pub fn status_notice(order: &Order) -> Option<NotificationCreate> {
    let user_id = order.user_id.as_ref()?;
    let (title, message) = match order.status {
        OrderStatus::Confirmed => ("Order confirmed", format!("Your order {} has been confirmed.", order.reference())),
        OrderStatus::Delivering => ("Order on its way", format!("Your order {} is out for delivery.", order.reference())),
        OrderStatus::Completed => ("Order delivered", format!("Your order {} has been delivered. Enjoy!", order.reference())),
        OrderStatus::Cancelled => ("Order cancelled", format!("Your order {} has been cancelled.", order.reference())),
        OrderStatus::Pending | OrderStatus::Preparing => return None,
    };
    Some(NotificationCreate::for_user(user_id.clone(), "order_status", title, message))
}
