use chrono::Utc;

use super::actions::{OrderAction, OrderActionResult};
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderStatus, PaymentStatus};

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = ();
    type Action = OrderAction;
    type ActionResult = OrderActionResult;

    const TABLE: &'static str = "orders";

    fn id(&self) -> &String { &self.id }

    /// Creates a new order from checkout params.
    ///
    /// # Notes
    /// The order starts `pending` with payment `pending`. Subtotal and total
    /// are computed here; `total = subtotal + delivery fee`.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, String> {
        if params.items.is_empty() {
            return Err("Order has no line items".to_string());
        }
        if let Some(item) = params.items.iter().find(|item| item.quantity == 0) {
            return Err(format!("Line item {} has zero quantity", item.name));
        }

        let subtotal = params.subtotal();
        let delivery_fee = params.delivery.fee;
        let now = Utc::now();

        Ok(Self {
            id,
            user_id: params.user_id,
            items: params.items,
            subtotal,
            delivery_fee,
            total: crate::domain::round_cents(subtotal + delivery_fee),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method_id: params.payment_method_id,
            customer: params.customer,
            delivery: params.delivery,
            notes: params.notes,
            created_at: now,
            updated_at: now,
        })
    }

    /// Orders only change through [`OrderAction`].
    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Orders are only changed through status actions".to_string())
    }

    fn on_delete(&self) -> Result<(), String> {
        Err("Orders cannot be deleted".to_string())
    }

    /// Handles order-specific actions.
    ///
    /// # Errors
    /// Re-selecting the current status or payment status is refused.
    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, String> {
        match action {
            OrderAction::SetStatus(status) => {
                if self.status == status {
                    return Err(format!("Order is already {}", status));
                }
                let from = self.status;
                self.status = status;
                self.updated_at = Utc::now();
                Ok(OrderActionResult::StatusChanged { from, order: self.clone() })
            }
            OrderAction::SetPaymentStatus(payment_status) => {
                if self.payment_status == payment_status {
                    return Err(format!("Payment is already {}", payment_status));
                }
                let from = self.payment_status;
                self.payment_status = payment_status;
                self.updated_at = Utc::now();
                Ok(OrderActionResult::PaymentChanged { from, order: self.clone() })
            }
        }
    }
}
