use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::database::models::{NewsDraft, NewsInput, NewsItem};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::AppState;

/// Turn a request body into validated fields, or a 400
fn draft_from_body(body: Result<Json<NewsInput>, JsonRejection>) -> Result<NewsDraft, ApiError> {
    let Json(input) = body.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;
    input
        .validate()
        .map_err(|field_errors| ApiError::validation_error("Invalid news item", Some(field_errors)))
}

/// GET /api/news - all news, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<NewsItem>> {
    let items = state.news.get_all_news().await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/news/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<NewsItem> {
    let item = state
        .news
        .get_news_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("News {} not found", id)))?;
    Ok(ApiResponse::success(item))
}

/// GET /api/news/category/:category
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Vec<NewsItem>> {
    let items = state.news.get_news_by_category(&category).await?;
    Ok(ApiResponse::success(items))
}

/// POST /api/news
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewsInput>, JsonRejection>,
) -> ApiResult<NewsItem> {
    let draft = draft_from_body(body)?;
    let item = state.news.create_news(draft).await?;
    Ok(ApiResponse::created(item))
}

/// PUT /api/news/:id - replaces every mutable field; omitted fields become null
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<NewsInput>, JsonRejection>,
) -> ApiResult<NewsItem> {
    let draft = draft_from_body(body)?;
    let item = state.news.update_news(id, draft).await?;
    Ok(ApiResponse::success(item))
}

/// DELETE /api/news/:id - 204 whether or not the record existed
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.news.delete_news(id).await?;
    Ok(ApiResponse::no_content())
}

/// GET /api/news/categories
pub async fn categories(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let categories = state.news.get_categories().await?;
    Ok(ApiResponse::success(categories))
}
