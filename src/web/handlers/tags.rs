use crate::models::Tag;
use crate::services::tags;
use crate::web::error::ApiResult;
use crate::web::state::AppState;
use axum::extract::State;
use axum::response::Json;
use std::sync::Arc;

/// GET /api/tags
pub async fn list_tags(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(tags::list_tags(&state.db)?))
}
