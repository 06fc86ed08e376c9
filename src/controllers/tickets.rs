use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::services::{orders, print};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tickets/{id}/print", get(print_ticket))
}

// GET /api/tickets/{id}/print
//
// `id` is a ticket id; the response covers the whole order the ticket
// belongs to, so printing any member of a group prints the group.
async fn print_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "ticket id must be > 0".to_string()));
    }

    let records = state.tickets.fetch_tickets().await.map_err(|e| {
        tracing::error!("failed to fetch tickets from upstream: {:?}", e);
        (
            StatusCode::BAD_GATEWAY,
            "Failed to retrieve tickets".to_string(),
        )
    })?;

    let order = orders::aggregate(&records)
        .into_iter()
        .find(|order| order.contains_ticket(id))
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Ticket not found".to_string()))?;

    match print::build_document(&order) {
        Ok(document) => Ok((StatusCode::OK, Json(document))),
        Err(print::PrintError::IncompleteData) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "Ticket data is incomplete, cannot print".to_string(),
        )),
        Err(e) => {
            tracing::error!("failed to build print document for ticket {}: {:?}", id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to build ticket document".to_string(),
            ))
        }
    }
}
