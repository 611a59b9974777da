use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::CurrentUser,
    models::RecommendationResponse,
    services::history,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    mood_id: Option<i64>,
}

/// Handler listing the caller's history, optionally filtered to one mood
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<RecommendationResponse>>> {
    let entries = history::list_recommendations(&state.db, user.id, query.mood_id).await?;
    Ok(Json(entries))
}

/// Handler for one history entry; foreign entries 404 like missing ones
pub async fn detail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<RecommendationResponse>> {
    let entry = history::get_recommendation(&state.db, user.id, id).await?;
    Ok(Json(entry))
}

/// Handler marking an entry viewed; repeat calls are a no-op success
pub async fn mark_viewed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<RecommendationResponse>> {
    let entry = history::mark_viewed(&state.db, user.id, id).await?;
    Ok(Json(entry))
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    #[serde(default)]
    rating: Option<i32>,
}

/// Handler storing the caller's 1-5 rating on a history entry
pub async fn rate(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(request): Json<RateRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let rating = request
        .rating
        .ok_or_else(|| AppError::Validation("rating is required".to_string()))?;
    let entry = history::set_rating(&state.db, user.id, id, rating).await?;
    Ok(Json(entry))
}

/// Handler deleting one history entry
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    history::delete_recommendation(&state.db, user.id, id).await?;
    Ok(Json(json!({ "message": "Recommendation deleted successfully" })))
}
