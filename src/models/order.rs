use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ticket::{Passenger, Route, TicketRecord, TicketStatus};

/// Aggregated projection of one booking: either every ticket sharing an
/// `order_group_id`, or a lone ungrouped ticket. Derived per request from the
/// raw rows, never stored or mutated.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(rename = "type")]
    pub kind: OrderKind,
    /// Id of the master ticket (or the lone ticket for singles).
    pub ticket_id: i64,
    pub order_group_id: Option<String>,
    pub total_tickets: usize,
    /// Seat labels of every ticket in the order, lexicographically sorted.
    pub seats: Vec<String>,
    pub status: TicketStatus,
    pub total_amount: f64,
    pub booked_at: Option<DateTime<Utc>>,
    pub payment_deadline: Option<DateTime<Utc>>,
    pub route: Option<Route>,
    pub passenger: Option<Passenger>,
    /// The source rows this view was built from.
    pub tickets: Vec<TicketRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Order,
    Single,
}

impl OrderView {
    /// True when the given ticket id belongs to this order.
    pub fn contains_ticket(&self, ticket_id: i64) -> bool {
        self.tickets.iter().any(|t| t.id == ticket_id)
    }

    /// Human-facing booking reference: the group id for grouped orders,
    /// `TB-{id}` for single tickets.
    pub fn reference(&self) -> String {
        match self.order_group_id {
            Some(ref group) => group.clone(),
            None => format!("TB-{}", self.ticket_id),
        }
    }
}
