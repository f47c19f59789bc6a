use chrono::Utc;

use super::actions::{EventRequestAction, EventRequestActionResult, InvoiceAction, InvoiceActionResult};
use crate::actor_framework::Entity;
use crate::domain::{
    EventInvoice, EventInvoiceCreate, EventInvoicePatch, EventRequest, EventRequestCreate, EventRequestStatus,
    InvoiceLine, InvoiceStatus, InvoiceTotals,
};

impl Entity for EventRequest {
    type Id = String;
    type CreateParams = EventRequestCreate;
    type Patch = ();
    type Action = EventRequestAction;
    type ActionResult = EventRequestActionResult;

    const TABLE: &'static str = "event_requests";

    fn id(&self) -> &String { &self.id }

    fn from_create_params(id: String, params: EventRequestCreate) -> Result<Self, String> {
        if params.contact_name.trim().is_empty() {
            return Err("Contact name is required".to_string());
        }
        if !params.contact_email.contains('@') {
            return Err(format!("Invalid email address: {}", params.contact_email));
        }
        if params.guest_count == 0 {
            return Err("Guest count must be at least 1".to_string());
        }
        Ok(Self {
            id,
            contact_name: params.contact_name.trim().to_string(),
            contact_email: params.contact_email.trim().to_string(),
            contact_phone: params.contact_phone,
            event_type: params.event_type,
            event_date: params.event_date,
            guest_count: params.guest_count,
            message: params.message,
            status: EventRequestStatus::New,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Event requests only change status".to_string())
    }

    fn handle_action(&mut self, action: EventRequestAction) -> Result<EventRequestActionResult, String> {
        match action {
            EventRequestAction::SetStatus(status) => {
                if self.status == status {
                    return Err(format!("Request is already {}", status));
                }
                let from = self.status;
                self.status = status;
                Ok(EventRequestActionResult::StatusChanged { from, to: status })
            }
        }
    }
}

fn validate_lines(lines: &[InvoiceLine], tax_rate: f64) -> Result<(), String> {
    if lines.is_empty() {
        return Err("Invoice needs at least one line".to_string());
    }
    if let Some(line) = lines
        .iter()
        .find(|line| line.quantity == 0 || !line.unit_price.is_finite() || line.unit_price < 0.0)
    {
        return Err(format!("Invalid invoice line: {}", line.description));
    }
    if !(0.0..=1.0).contains(&tax_rate) {
        return Err(format!("Tax rate must be a fraction in [0, 1], got {}", tax_rate));
    }
    Ok(())
}

impl Entity for EventInvoice {
    type Id = String;
    type CreateParams = EventInvoiceCreate;
    type Patch = EventInvoicePatch;
    type Action = InvoiceAction;
    type ActionResult = InvoiceActionResult;

    const TABLE: &'static str = "event_invoices";

    fn id(&self) -> &String { &self.id }

    fn from_create_params(id: String, params: EventInvoiceCreate) -> Result<Self, String> {
        validate_lines(&params.lines, params.tax_rate)?;
        let totals = InvoiceTotals::compute(&params.lines, params.tax_rate);
        Ok(Self {
            id,
            request_id: params.request_id,
            invoice_number: params.invoice_number,
            lines: params.lines,
            tax_rate: params.tax_rate,
            totals,
            status: InvoiceStatus::Draft,
            created_at: Utc::now(),
        })
    }

    /// Draft invoices only. Totals are recomputed.
    fn on_update(&mut self, patch: EventInvoicePatch) -> Result<(), String> {
        if self.status != InvoiceStatus::Draft {
            return Err(format!("Invoice {} is no longer a draft", self.invoice_number));
        }
        let lines = patch.lines.unwrap_or_else(|| self.lines.clone());
        let tax_rate = patch.tax_rate.unwrap_or(self.tax_rate);
        validate_lines(&lines, tax_rate)?;
        self.totals = InvoiceTotals::compute(&lines, tax_rate);
        self.lines = lines;
        self.tax_rate = tax_rate;
        Ok(())
    }

    fn on_delete(&self) -> Result<(), String> {
        if self.status == InvoiceStatus::Draft {
            Ok(())
        } else {
            Err(format!("Invoice {} has been issued", self.invoice_number))
        }
    }

    fn handle_action(&mut self, action: InvoiceAction) -> Result<InvoiceActionResult, String> {
        let from = self.status;
        let to = match (action, from) {
            (InvoiceAction::MarkSent, InvoiceStatus::Draft) => InvoiceStatus::Sent,
            (InvoiceAction::MarkPaid, InvoiceStatus::Draft | InvoiceStatus::Sent) => InvoiceStatus::Paid,
            (action, _) => {
                return Err(format!("Cannot apply {:?} to an invoice that is {:?}", action, from));
            }
        };
        self.status = to;
        Ok(InvoiceActionResult::StatusChanged { from, to })
    }
}
