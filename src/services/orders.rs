//! Order aggregation: folds the flat ticket rows served by the upstream
//! store into per-booking `OrderView`s for the payment dashboard and the
//! printable ticket.
//!
//! Grouping is a single pass over the input keyed by `order_group_id`;
//! every input row lands in exactly one view.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{OrderKind, OrderView, TicketRecord, TicketStatus};

/// Groups tickets into orders, preserving first-seen input order.
///
/// Tickets sharing an `order_group_id` become one `Order` view; tickets
/// without one each become a `Single` view. Status, deadlines, route and
/// passenger come from the group's master ticket (the row flagged
/// `is_master_ticket`, else the first row collected).
pub fn aggregate(records: &[TicketRecord]) -> Vec<OrderView> {
    // Slot per output view, in first-seen order; grouped tickets accumulate
    // in the map while later rows of the same group are appended.
    enum Slot {
        Group(String),
        Single(TicketRecord),
    }

    let mut groups: BTreeMap<String, Vec<TicketRecord>> = BTreeMap::new();
    let mut slots: Vec<Slot> = Vec::new();

    for record in records {
        match record.order_group_id {
            Some(ref group_id) => {
                let members = groups.entry(group_id.clone()).or_default();
                if members.is_empty() {
                    slots.push(Slot::Group(group_id.clone()));
                }
                members.push(record.clone());
            }
            None => slots.push(Slot::Single(record.clone())),
        }
    }

    slots
        .into_iter()
        .filter_map(|slot| match slot {
            Slot::Group(group_id) => groups.remove(&group_id).map(grouped_view),
            Slot::Single(ticket) => Some(single_view(ticket)),
        })
        .collect()
}

/// The dashboard view: aggregated orders still awaiting payment, most
/// recent deadline first. A missing deadline sorts as the Unix epoch, i.e.
/// after everything with a real deadline.
pub fn pending_payments(records: &[TicketRecord]) -> Vec<OrderView> {
    let mut pending: Vec<OrderView> = aggregate(records)
        .into_iter()
        .filter(|order| order.status == TicketStatus::Pending)
        .collect();
    pending.sort_by_key(|order| std::cmp::Reverse(deadline_or_epoch(order)));
    pending
}

fn deadline_or_epoch(order: &OrderView) -> DateTime<Utc> {
    order.payment_deadline.unwrap_or(DateTime::UNIX_EPOCH)
}

fn grouped_view(tickets: Vec<TicketRecord>) -> OrderView {
    let master = tickets
        .iter()
        .find(|t| t.is_master)
        .unwrap_or(&tickets[0])
        .clone();

    let mut seats: Vec<String> = tickets.iter().filter_map(|t| t.seat.clone()).collect();
    seats.sort();

    // The order-level total lives on the master row; a missing or zero
    // value means the upstream never set it, so fall back to summing the
    // per-ticket amounts.
    let total_amount = master
        .order_total_amount
        .filter(|amount| *amount > 0.0)
        .unwrap_or_else(|| tickets.iter().map(|t| t.amount).sum());

    OrderView {
        kind: OrderKind::Order,
        ticket_id: master.id,
        order_group_id: master.order_group_id.clone(),
        total_tickets: tickets.len(),
        seats,
        status: master.status,
        total_amount,
        booked_at: master.booked_at,
        payment_deadline: master.payment_deadline,
        route: master.route,
        passenger: master.passenger,
        tickets,
    }
}

fn single_view(ticket: TicketRecord) -> OrderView {
    OrderView {
        kind: OrderKind::Single,
        ticket_id: ticket.id,
        order_group_id: None,
        total_tickets: 1,
        seats: ticket.seat.clone().into_iter().collect(),
        status: ticket.status,
        total_amount: ticket.amount,
        booked_at: ticket.booked_at,
        payment_deadline: ticket.payment_deadline,
        route: ticket.route.clone(),
        passenger: ticket.passenger.clone(),
        tickets: vec![ticket],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use serde_json::json;

    fn ticket(v: serde_json::Value) -> TicketRecord {
        serde_json::from_value(v).expect("test ticket should decode")
    }

    #[test]
    fn test_group_sums_amounts_when_no_order_total() {
        let records = vec![
            ticket(json!({
                "id_tiket": 1, "order_group_id": "A", "is_master_ticket": true,
                "batas_pembayaran": "2024-01-02", "total_bayar": "50",
                "nomor_kursi": "B2", "status_tiket": "pending"
            })),
            ticket(json!({
                "id_tiket": 2, "order_group_id": "A",
                "total_bayar": "70", "nomor_kursi": "B1"
            })),
        ];

        let orders = aggregate(&records);
        assert_eq!(orders.len(), 1);

        let order = &orders[0];
        assert_eq!(order.kind, OrderKind::Order);
        assert_eq!(order.ticket_id, 1);
        assert_eq!(order.total_tickets, 2);
        assert_eq!(order.total_amount, 120.0);
        assert_eq!(order.seats, vec!["B1", "B2"]);
        assert_eq!(order.status, TicketStatus::Pending);
    }

    #[test]
    fn test_order_total_on_master_wins_over_sum() {
        let records = vec![
            ticket(json!({
                "id_tiket": 1, "order_group_id": "A", "is_master_ticket": true,
                "total_bayar": "50", "order_total_amount": "110"
            })),
            ticket(json!({ "id_tiket": 2, "order_group_id": "A", "total_bayar": "70" })),
        ];
        assert_eq!(aggregate(&records)[0].total_amount, 110.0);
    }

    #[test]
    fn test_master_defaults_to_first_collected_row() {
        let records = vec![
            ticket(json!({ "id_tiket": 9, "order_group_id": "A", "status_tiket": "confirmed" })),
            ticket(json!({ "id_tiket": 3, "order_group_id": "A", "status_tiket": "pending" })),
        ];
        let orders = aggregate(&records);
        assert_eq!(orders[0].ticket_id, 9);
        assert_eq!(orders[0].status, TicketStatus::Confirmed);
    }

    #[test]
    fn test_group_members_merge_regardless_of_input_position() {
        let records = vec![
            ticket(json!({ "id_tiket": 1, "order_group_id": "A" })),
            ticket(json!({ "id_tiket": 2 })),
            ticket(json!({ "id_tiket": 3, "order_group_id": "A" })),
        ];
        let orders = aggregate(&records);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].total_tickets, 2);
        assert!(orders[0].contains_ticket(1) && orders[0].contains_ticket(3));
        assert_eq!(orders[1].kind, OrderKind::Single);
        assert_eq!(orders[1].ticket_id, 2);
    }

    #[test]
    fn test_pending_filter_drops_other_statuses() {
        let records = vec![
            ticket(json!({ "id_tiket": 1, "status_tiket": "pending" })),
            ticket(json!({ "id_tiket": 2, "status_tiket": "confirmed" })),
            ticket(json!({ "id_tiket": 3, "status_tiket": "cancelled" })),
            ticket(json!({ "id_tiket": 4 })),
        ];
        let pending = pending_payments(&records);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].ticket_id, 1);
    }

    #[test]
    fn test_pending_sorted_by_deadline_descending_missing_last() {
        let records = vec![
            ticket(json!({ "id_tiket": 1, "status_tiket": "pending",
                           "batas_pembayaran": "2024-01-01" })),
            ticket(json!({ "id_tiket": 2, "status_tiket": "pending" })),
            ticket(json!({ "id_tiket": 3, "status_tiket": "pending",
                           "batas_pembayaran": "2024-01-05" })),
        ];
        let pending = pending_payments(&records);
        let ids: Vec<i64> = pending.iter().map(|o| o.ticket_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_single_ticket_without_seat_has_empty_seat_list() {
        let records = vec![ticket(json!({ "id_tiket": 1 }))];
        let orders = aggregate(&records);
        assert!(orders[0].seats.is_empty());
        assert_eq!(orders[0].reference(), "TB-1");
    }

    #[test]
    fn test_grouped_reference_is_the_group_id() {
        let records = vec![ticket(json!({ "id_tiket": 1, "order_group_id": "ORD-77" }))];
        assert_eq!(aggregate(&records)[0].reference(), "ORD-77");
    }

    #[test]
    fn test_deadline_of_grouped_order_comes_from_master() {
        let records = vec![
            ticket(json!({ "id_tiket": 1, "order_group_id": "A",
                           "batas_pembayaran": "2024-02-01" })),
            ticket(json!({ "id_tiket": 2, "order_group_id": "A", "is_master_ticket": true,
                           "batas_pembayaran": "2024-03-01" })),
        ];
        let order = &aggregate(&records)[0];
        assert_eq!(order.ticket_id, 2);
        assert_eq!(
            order.payment_deadline,
            Some(chrono::Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    fn arb_ticket() -> impl Strategy<Value = TicketRecord> {
        (
            1i64..500,
            prop_oneof![
                Just(None::<String>),
                "[A-D]".prop_map(Some),
            ],
            any::<bool>(),
            0u32..200_000,
        )
            .prop_map(|(id, group, is_master, amount)| {
                ticket(json!({
                    "id_tiket": id,
                    "order_group_id": group,
                    "is_master_ticket": is_master,
                    "total_bayar": amount.to_string(),
                }))
            })
    }

    proptest! {
        // Every input row must land in exactly one view, and rows sharing a
        // group id must land in the same view.
        #[test]
        fn prop_aggregation_partitions_the_input(records in prop::collection::vec(arb_ticket(), 0..40)) {
            let orders = aggregate(&records);

            let emitted: usize = orders.iter().map(|o| o.tickets.len()).sum();
            prop_assert_eq!(emitted, records.len());
            for order in &orders {
                prop_assert_eq!(order.total_tickets, order.tickets.len());
            }

            for (i, record) in records.iter().enumerate() {
                let held = orders.iter().any(|o| o.tickets.iter().any(|t| t == record));
                prop_assert!(held, "record {} missing from output", i);
            }

            for order in &orders {
                let groups: Vec<_> = order.tickets.iter().map(|t| t.order_group_id.clone()).collect();
                match order.kind {
                    OrderKind::Order => prop_assert!(groups.iter().all(|g| g.as_deref() == order.order_group_id.as_deref())),
                    OrderKind::Single => prop_assert_eq!(order.tickets.len(), 1),
                }
            }

            // No group id appears in two different views.
            let mut seen = std::collections::BTreeSet::new();
            for order in &orders {
                if let Some(ref g) = order.order_group_id {
                    prop_assert!(seen.insert(g.clone()), "group {} split across views", g);
                }
            }
        }
    }
}
