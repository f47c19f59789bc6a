use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::NotificationClient;
use crate::domain::{
    invoice_number, invoice_sequence, EventInvoice, EventInvoiceCreate, EventInvoicePatch, EventRequest, EventRequestCreate,
    EventRequestStatus, InvoiceLine, InvoiceStatus, NotificationCreate,
};
use crate::event_actor::{
    EventError, EventRequestAction, EventRequestActionResult, InvoiceAction, InvoiceActionResult,
};

/// Client for catering requests and their invoices.
#[derive(Clone)]
pub struct EventClient {
    requests: ResourceClient<EventRequest>,
    invoices: ResourceClient<EventInvoice>,
    notification_client: NotificationClient,
    /// Last number handed out. Held across list and create so numbers never repeat.
    last_issued: Arc<Mutex<Option<(NaiveDate, usize)>>>,
}

crate::impl_client_methods!(EventClient, requests: EventRequest, EventError, request, requests);
crate::impl_client_methods!(EventClient, invoices: EventInvoice, EventError, invoice, invoices);
crate::impl_client_delete!(EventClient, invoices: EventInvoice, EventError, invoice);

impl EventClient {
    pub fn new(
        requests: ResourceClient<EventRequest>,
        invoices: ResourceClient<EventInvoice>,
        notification_client: NotificationClient,
    ) -> Self {
        Self { requests, invoices, notification_client, last_issued: Arc::new(Mutex::new(None)) }
    }

    /// Store an enquiry and let the admins know.
    #[instrument(skip(self, params), fields(event_type = %params.event_type, guests = params.guest_count))]
    pub async fn submit_request(&self, params: EventRequestCreate) -> Result<EventRequest, EventError> {
        debug!("Sending request");
        let request = self.requests.create(params).await?;
        info!(request_id = %request.id, "Event request received");

        let notice = NotificationCreate::for_admins(
            "event_request",
            "New event request",
            format!(
                "{} asked about a {} for {} guests on {}",
                request.contact_name,
                request.event_type,
                request.guest_count,
                request.event_date.format("%Y-%m-%d")
            ),
        );
        if let Err(e) = self.notification_client.notify(notice).await {
            warn!(request_id = %request.id, error = %e, "Failed to notify admins about event request");
        }

        Ok(request)
    }

    #[instrument(skip(self))]
    pub async fn set_request_status(
        &self,
        id: String,
        status: EventRequestStatus,
    ) -> Result<EventRequestStatus, EventError> {
        debug!("Sending request");
        match self.requests.perform_action(id, EventRequestAction::SetStatus(status)).await? {
            EventRequestActionResult::StatusChanged { from, to } => {
                info!(%from, %to, "Event request status changed");
                Ok(to)
            }
        }
    }

    /// Issue a draft invoice against a request. A request that is still
    /// `new` moves to `quoted`.
    #[instrument(skip(self, lines))]
    pub async fn create_invoice(
        &self,
        request_id: String,
        lines: Vec<InvoiceLine>,
        tax_rate: f64,
    ) -> Result<EventInvoice, EventError> {
        let request = self
            .requests
            .get(request_id.clone())
            .await?
            .ok_or_else(|| EventError::NotFound(request_id.clone()))?;

        let mut last_issued = self.last_issued.lock().await;
        let today = Utc::now().date_naive();
        let highest_stored = self
            .invoices
            .list_where(move |invoice: &EventInvoice| invoice_sequence(&invoice.invoice_number, today).is_some())
            .await?
            .iter()
            .filter_map(|invoice| invoice_sequence(&invoice.invoice_number, today))
            .max()
            .unwrap_or(0);
        // Deleted drafts leave gaps; their numbers are not handed out again.
        let highest_issued = match *last_issued {
            Some((day, sequence)) if day == today => sequence,
            _ => 0,
        };
        let sequence = highest_stored.max(highest_issued) + 1;

        debug!("Sending request");
        let invoice = self
            .invoices
            .create(EventInvoiceCreate {
                request_id: request.id.clone(),
                invoice_number: invoice_number(today, sequence),
                lines,
                tax_rate,
            })
            .await?;
        *last_issued = Some((today, sequence));
        drop(last_issued);
        info!(invoice_number = %invoice.invoice_number, total = invoice.totals.total, "Invoice created");

        if request.status == EventRequestStatus::New {
            self.set_request_status(request.id, EventRequestStatus::Quoted).await?;
        }

        Ok(invoice)
    }

    #[instrument(skip(self))]
    pub async fn update_invoice(&self, id: String, patch: EventInvoicePatch) -> Result<EventInvoice, EventError> {
        debug!("Sending request");
        Ok(self.invoices.update(id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn mark_invoice_sent(&self, id: String) -> Result<InvoiceStatus, EventError> {
        self.invoice_action(id, InvoiceAction::MarkSent).await
    }

    #[instrument(skip(self))]
    pub async fn mark_invoice_paid(&self, id: String) -> Result<InvoiceStatus, EventError> {
        self.invoice_action(id, InvoiceAction::MarkPaid).await
    }

    async fn invoice_action(&self, id: String, action: InvoiceAction) -> Result<InvoiceStatus, EventError> {
        debug!("Sending request");
        match self.invoices.perform_action(id, action).await? {
            InvoiceActionResult::StatusChanged { from, to } => {
                info!(?from, ?to, "Invoice status changed");
                Ok(to)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn invoices_for_request(&self, request_id: String) -> Result<Vec<EventInvoice>, EventError> {
        debug!("Sending request");
        Ok(self
            .invoices
            .list_where(move |invoice: &EventInvoice| invoice.request_id == request_id)
            .await?)
    }
}
