use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::services::auth::{self, AuthError};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/token", post(issue_token))
}

// POST /api/auth/token
#[derive(Debug, Deserialize)]
struct TokenRequest {
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    pub token: String,
}

async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TokenRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.user_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "user_id must be > 0".to_string()));
    }

    match auth::issue_token(req.user_id, &state.config.jwt) {
        Ok(token) => Ok((StatusCode::CREATED, Json(TokenResponse { token }))),
        Err(AuthError::MissingSecret) => {
            tracing::error!("token requested but JWT_SECRET is not configured");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Signing secret is not configured".to_string(),
            ))
        }
        Err(e) => {
            tracing::error!("token signing failed: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to issue token".to_string(),
            ))
        }
    }
}
