use crate::error::Error;
use crate::models::{CreatePost, Post, PostPage, UpdatePost};
use crate::services::posts;
use crate::web::error::ApiResult;
use crate::web::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    #[serde(default)]
    pub search: String,
    pub page_number: Option<usize>,
    pub page_size: Option<usize>,
}

fn paginate(
    page_number: Option<usize>,
    page_size: Option<usize>,
    default_size: usize,
    max_size: usize,
) -> (usize, usize) {
    let page = page_number.unwrap_or(1).max(1);
    let size = page_size.unwrap_or(default_size).clamp(1, max_size);
    (page, size)
}

/// GET /api/posts?search=&pageNumber=&pageSize=
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PostListQuery>,
) -> ApiResult<Json<PostPage>> {
    let (page, size) = paginate(
        params.page_number,
        params.page_size,
        state.config.api.default_page_size,
        state.config.api.max_page_size,
    );

    let posts = posts::search_posts(&state.db, &params.search, page, size)?;
    let total = posts::count_posts(&state.db, &params.search)? as usize;
    let last_page = total.div_ceil(size).max(1);

    Ok(Json(PostPage {
        posts,
        has_prev: page > 1,
        has_next: page < last_page,
        last_page,
    }))
}

/// GET /api/posts/:id
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Post>> {
    let post = posts::get_post(&state.db, id)?.ok_or(Error::NotFound("post"))?;
    Ok(Json(post))
}

/// POST /api/posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreatePost>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let post = posts::create_post(&state.db, input)?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/posts/:id
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<UpdatePost>,
) -> ApiResult<Json<Post>> {
    if input.id.is_some_and(|body_id| body_id != id) {
        return Err(Error::Validation("id in body does not match path".into()).into());
    }
    let post = posts::update_post(&state.db, id, input)?;
    Ok(Json(post))
}

/// DELETE /api/posts/:id
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    posts::delete_post(&state.db, id)?;
    Ok(StatusCode::OK)
}

/// POST /api/posts/:id/likes — responds with the new count as plain text.
pub async fn like_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<String> {
    let count = posts::increment_likes(&state.db, id)?;
    Ok(count.to_string())
}
