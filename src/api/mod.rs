//! REST API endpoints.
//!
//! Axum-based HTTP shell over the roster controller: team summary, team
//! match history, per-player detail and refresh status.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::refresh::RefreshError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<RefreshError> for ApiError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::UnknownPlayer(id) => ApiError::NotFound(format!("player {}", id)),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// CORS layer for the configured origin. `*` allows any origin.
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin {
        "*" => layer.allow_origin(Any),
        other => match HeaderValue::from_str(other) {
            Ok(value) => layer.allow_origin(value),
            Err(_) => {
                tracing::warn!("Invalid CORS origin {:?}, allowing any", other);
                layer.allow_origin(Any)
            }
        },
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origin);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/team", get(routes::team::get_team))
        .route("/api/team-history", get(routes::team::get_team_history))
        .route("/api/players/:name/:tag", get(routes::players::get_player))
        .route("/api/refresh/status", get(routes::refresh::get_status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_player_maps_to_not_found() {
        let err = ApiError::from(RefreshError::UnknownPlayer("Ghost#0000".into()));
        let resp = err.into_response();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Not found: player Ghost#0000");
    }

    #[test]
    fn test_bad_request_status_code() {
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
