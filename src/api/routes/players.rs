use axum::extract::{Path, State};
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::PlayerDetail;

/// GET /api/players/:name/:tag
pub async fn get_player(
    State(state): State<AppState>,
    Path((name, tag)): Path<(String, String)>,
) -> Result<Json<PlayerDetail>, ApiError> {
    if name.trim().is_empty() || tag.trim().is_empty() {
        return Err(ApiError::BadRequest("name and tag are required".to_string()));
    }

    let detail = state.controller.player_detail(&name, &tag).await?;
    Ok(Json(detail))
}
