//! Printable-ticket payload: the document fields, the machine-scannable QR
//! payload and the barcode string for one aggregated order. Layout and
//! print triggering stay in the frontend; this module only supplies data.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::{OrderView, TicketStatus};

#[derive(Debug, Error)]
pub enum PrintError {
    /// Route or passenger data missing; better to refuse than to emit a
    /// half-empty ticket.
    #[error("ticket data is incomplete, refusing to print")]
    IncompleteData,
    #[error("failed to encode QR payload: {0}")]
    QrEncoding(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
pub struct TicketDocument {
    pub bus_name: String,
    pub origin: String,
    pub destination: String,
    pub departure_at: Option<DateTime<Utc>>,
    pub seats: Vec<String>,
    /// Group id for grouped orders, `TB-{id}` for single tickets.
    pub reference: String,
    pub total_tickets: usize,
    pub passenger_name: String,
    pub passenger_email: Option<String>,
    pub passenger_phone: Option<String>,
    pub status: TicketStatus,
    /// JSON string fed to the QR renderer.
    pub qr_payload: String,
    /// `TB{ticket_id}{YYYYMMDD}` of the departure date.
    pub barcode: String,
}

#[derive(Debug, Serialize)]
struct QrPayload<'a> {
    id: String,
    name: &'a str,
    route: String,
    date: Option<DateTime<Utc>>,
    seats: &'a [String],
    tickets: usize,
}

/// Builds the print document for one order. Fails when the minimum data
/// (route endpoints and passenger name) is missing.
pub fn build_document(order: &OrderView) -> Result<TicketDocument, PrintError> {
    let route = order.route.as_ref().ok_or(PrintError::IncompleteData)?;
    let origin = route.origin.clone().ok_or(PrintError::IncompleteData)?;
    let destination = route.destination.clone().ok_or(PrintError::IncompleteData)?;
    let passenger = order.passenger.as_ref().ok_or(PrintError::IncompleteData)?;
    let name = passenger.username.clone().ok_or(PrintError::IncompleteData)?;

    let qr_payload = serde_json::to_string(&QrPayload {
        id: order.reference(),
        name: &name,
        route: format!("{origin}-{destination}"),
        date: route.departure_at,
        seats: &order.seats,
        tickets: order.total_tickets,
    })?;

    let barcode_date = route.departure_at.unwrap_or_else(Utc::now);
    let barcode = format!("TB{}{}", order.ticket_id, barcode_date.format("%Y%m%d"));

    Ok(TicketDocument {
        bus_name: route.bus_label().unwrap_or("N/A").to_string(),
        origin,
        destination,
        departure_at: route.departure_at,
        seats: order.seats.clone(),
        reference: order.reference(),
        total_tickets: order.total_tickets,
        passenger_name: name,
        passenger_email: passenger.email.clone(),
        passenger_phone: passenger.phone.clone(),
        status: order.status,
        qr_payload,
        barcode,
    })
}
