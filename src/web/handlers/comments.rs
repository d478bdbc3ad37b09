use crate::error::Error;
use crate::models::{Comment, CreateComment, UpdateComment};
use crate::services::{comments, posts};
use crate::web::error::ApiResult;
use crate::web::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use std::sync::Arc;

/// GET /api/posts/:id/comments
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
) -> ApiResult<Json<Vec<Comment>>> {
    if !posts::exists(&state.db, post_id)? {
        return Err(Error::NotFound("post").into());
    }
    Ok(Json(comments::comments_for_post(&state.db, post_id)?))
}

/// POST /api/posts/:id/comments
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<i64>,
    Json(input): Json<CreateComment>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = comments::create_comment(&state.db, post_id, input)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/comments/:id
pub async fn get_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Comment>> {
    let comment = comments::get_comment(&state.db, id)?.ok_or(Error::NotFound("comment"))?;
    Ok(Json(comment))
}

/// PUT /api/comments/:id
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateComment>,
) -> ApiResult<Json<Comment>> {
    if input.id.is_some_and(|body_id| body_id != id) {
        return Err(Error::Validation("id in body does not match path".into()).into());
    }
    let comment = comments::update_comment(&state.db, id, input)?;
    Ok(Json(comment))
}

/// DELETE /api/comments/:id
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    comments::delete_comment(&state.db, id)?;
    Ok(StatusCode::OK)
}
