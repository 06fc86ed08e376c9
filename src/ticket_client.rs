//! HTTP client for the upstream ticket store.
//!
//! The store serves raw ticket rows as a JSON array. Rows are decoded one
//! by one: a row the store managed to corrupt is logged and skipped, it
//! never fails the whole batch.

use serde_json::Value;
use thiserror::Error;
use tokio::time::Duration;
use tracing::warn;

use crate::config::UpstreamConfig;
use crate::models::TicketRecord;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("ticket store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ticket store returned status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Clone)]
pub struct TicketClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl TicketClient {
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Fetches every ticket row from the store.
    pub async fn fetch_tickets(&self) -> Result<Vec<TicketRecord>, ClientError> {
        let response = self
            .http_client
            .get(format!("{}/api/tiket", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let rows: Vec<Value> = response.json().await?;
        Ok(decode_rows(rows))
    }
}

/// Decodes rows individually, dropping the ones that do not look like a
/// ticket (non-objects, missing `id_tiket`).
pub fn decode_rows(rows: Vec<Value>) -> Vec<TicketRecord> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<TicketRecord>(row) {
            Ok(ticket) => Some(ticket),
            Err(e) => {
                warn!("skipping malformed ticket row: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_decode_rows_skips_malformed_entries() {
        let rows = vec![
            json!({ "id_tiket": 1, "status_tiket": "pending" }),
            json!("bukan objek"),
            json!(42),
            json!({ "nomor_kursi": "A1" }), // no id
            json!({ "id_tiket": 2 }),
        ];
        let tickets = decode_rows(rows);
        let ids: Vec<i64> = tickets.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_fetch_tickets_decodes_and_skips() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tiket"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id_tiket": 1, "order_group_id": "A", "total_bayar": "50" },
                null,
                { "id_tiket": 2, "total_bayar": "abc" }
            ])))
            .mount(&server)
            .await;

        let client = TicketClient::from_config(&UpstreamConfig {
            base_url: server.uri(),
            timeout_seconds: 5,
        });

        let tickets = client.fetch_tickets().await.unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].amount, 50.0);
        assert_eq!(tickets[1].amount, 0.0);
    }

    #[tokio::test]
    async fn test_fetch_tickets_surfaces_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tiket"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = TicketClient::from_config(&UpstreamConfig {
            base_url: server.uri(),
            timeout_seconds: 5,
        });

        let err = client.fetch_tickets().await.unwrap_err();
        assert!(matches!(err, ClientError::Status(s) if s.as_u16() == 500));
    }
}
