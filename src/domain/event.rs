use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::round_cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventRequestStatus {
    New,
    Quoted,
    Confirmed,
    Declined,
}

impl fmt::Display for EventRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EventRequestStatus::New => "new",
            EventRequestStatus::Quoted => "quoted",
            EventRequestStatus::Confirmed => "confirmed",
            EventRequestStatus::Declined => "declined",
        };
        f.write_str(text)
    }
}

/// Catering or private-event enquiry from the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRequest {
    pub id: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub event_type: String,
    pub event_date: NaiveDate,
    pub guest_count: u32,
    pub message: String,
    pub status: EventRequestStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRequestCreate {
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub event_type: String,
    pub event_date: NaiveDate,
    pub guest_count: u32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl InvoiceLine {
    pub fn amount(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

/// Money breakdown of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl InvoiceTotals {
    /// `tax_rate` is a fraction, e.g. 0.2 for 20%.
    pub fn compute(lines: &[InvoiceLine], tax_rate: f64) -> Self {
        let subtotal = round_cents(lines.iter().map(InvoiceLine::amount).sum());
        let tax = round_cents(subtotal * tax_rate);
        Self {
            subtotal,
            tax,
            total: round_cents(subtotal + tax),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInvoice {
    pub id: String,
    pub request_id: String,
    pub invoice_number: String,
    pub lines: Vec<InvoiceLine>,
    pub tax_rate: f64,
    pub totals: InvoiceTotals,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct EventInvoiceCreate {
    pub request_id: String,
    pub invoice_number: String,
    pub lines: Vec<InvoiceLine>,
    pub tax_rate: f64,
}

/// Draft-only edit of an invoice's lines or tax rate.
#[derive(Debug, Clone, Default)]
pub struct EventInvoicePatch {
    pub lines: Option<Vec<InvoiceLine>>,
    pub tax_rate: Option<f64>,
}

/// `INV-YYYYMMDD-NNNN`, numbered per day of issue.
pub fn invoice_number(issued_on: NaiveDate, sequence: usize) -> String {
    format!("INV-{}-{:04}", issued_on.format("%Y%m%d"), sequence)
}

/// Sequence part of a number issued on `issued_on`, if `number` is one.
pub fn invoice_sequence(number: &str, issued_on: NaiveDate) -> Option<usize> {
    let prefix = format!("INV-{}-", issued_on.format("%Y%m%d"));
    number.strip_prefix(&prefix)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_totals_include_tax() {
        let lines = vec![
            InvoiceLine { description: "Buffet".into(), quantity: 40, unit_price: 18.5 },
            InvoiceLine { description: "Service".into(), quantity: 1, unit_price: 120.0 },
        ];
        let totals = InvoiceTotals::compute(&lines, 0.1);
        assert_eq!(totals.subtotal, 860.0);
        assert_eq!(totals.tax, 86.0);
        assert_eq!(totals.total, 946.0);
    }

    #[test]
    fn test_invoice_number_format() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(invoice_number(day, 7), "INV-20260309-0007");
    }

    #[test]
    fn test_invoice_sequence_reads_same_day_only() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let next_day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert_eq!(invoice_sequence("INV-20260309-0012", day), Some(12));
        assert_eq!(invoice_sequence("INV-20260309-0012", next_day), None);
        assert_eq!(invoice_sequence("INV-20260309-draft", day), None);
    }
}
