use crate::domain::{Order, OrderStatus, PaymentStatus};

/// Admin actions on an order. These are the only way an order changes after checkout.
#[derive(Debug, Clone)]
pub enum OrderAction {
    SetStatus(OrderStatus),
    SetPaymentStatus(PaymentStatus),
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone)]
pub enum OrderActionResult {
    StatusChanged { from: OrderStatus, order: Order },
    PaymentChanged { from: PaymentStatus, order: Order },
}
