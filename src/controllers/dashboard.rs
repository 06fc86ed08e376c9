use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::models::OrderView;
use crate::services::{orders, urgency};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard/pending-payments", get(pending_payments))
}

#[derive(Debug, Serialize)]
struct PendingPaymentEntry {
    #[serde(flatten)]
    order: OrderView,
    urgency: urgency::Urgency,
    hours_remaining: i64,
}

// GET /api/dashboard/pending-payments
async fn pending_payments(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let records = state.tickets.fetch_tickets().await.map_err(|e| {
        tracing::error!("failed to fetch tickets from upstream: {:?}", e);
        (
            StatusCode::BAD_GATEWAY,
            "Failed to retrieve tickets".to_string(),
        )
    })?;

    let now = Utc::now();
    let entries: Vec<PendingPaymentEntry> = orders::pending_payments(&records)
        .into_iter()
        .map(|order| PendingPaymentEntry {
            urgency: urgency::classify(order.payment_deadline, now),
            hours_remaining: urgency::hours_remaining(order.payment_deadline, now),
            order,
        })
        .collect();

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "count": entries.len(),
            "orders": entries,
        })),
    ))
}
