use crate::domain::{EventRequestStatus, InvoiceStatus};

#[derive(Debug, Clone)]
pub enum EventRequestAction {
    SetStatus(EventRequestStatus),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventRequestActionResult {
    StatusChanged { from: EventRequestStatus, to: EventRequestStatus },
}

#[derive(Debug, Clone)]
pub enum InvoiceAction {
    MarkSent,
    MarkPaid,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceActionResult {
    StatusChanged { from: InvoiceStatus, to: InvoiceStatus },
}
