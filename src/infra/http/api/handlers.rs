//! Posts handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::posts::PostId;

use super::error::ApiError;
use super::models::*;
use super::state::ApiState;

pub async fn list_posts(
    State(state): State<ApiState>,
    Query(params): Query<QueryPairs>,
) -> Result<impl IntoResponse, ApiError> {
    let query = PostListQuery::from(params);
    let posts = state
        .store
        .list(query.sort_by.as_deref(), query.order.as_deref())?;

    Ok(Json(posts))
}

pub async fn create_post(
    State(state): State<ApiState>,
    Json(payload): Json<PostCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.store.insert(payload.into())?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// An unknown id answers 404 before the body is looked at.
pub async fn update_post(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<PostUpdateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&raw_id)?;
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(_) if !state.store.contains(id) => return Err(ApiError::post_not_found(id)),
        Err(rejection) => return Err(ApiError::from(rejection)),
    };
    let post = state.store.update(id, payload.into())?;

    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&raw_id)?;
    state.store.delete(id)?;

    Ok(Json(DeleteResponse {
        message: format!("Post with id {id} has been deleted successfully."),
    }))
}

pub async fn search_posts(
    State(state): State<ApiState>,
    Query(params): Query<QueryPairs>,
) -> impl IntoResponse {
    let query = PostSearchQuery::from(params);
    Json(
        state
            .store
            .search(query.title.as_deref(), query.content.as_deref()),
    )
}

/// Only plain decimal digits name a post; anything else is reported as not found.
fn parse_post_id(raw: &str) -> Result<PostId, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ApiError::post_not_found(raw));
    }
    raw.parse::<PostId>()
        .map_err(|_| ApiError::post_not_found(raw))
}
