use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::refresh::RefreshReport;

/// GET /api/refresh/status
pub async fn get_status(State(state): State<AppState>) -> Json<RefreshReport> {
    Json(state.controller.last_report().await)
}
