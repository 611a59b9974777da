use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::CurrentUser,
    models::{MovieResponse, RecommendResponse},
    routes::recommendations,
    services::{movies, recommendations as recommendation_flow},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/:id", get(detail))
        .route("/recommend", post(recommend))
        .route("/recommendations", get(recommendations::list))
        .route(
            "/recommendations/:id",
            get(recommendations::detail).delete(recommendations::delete),
        )
        .route("/recommendations/:id/view", post(recommendations::mark_viewed))
        .route("/recommendations/:id/rate", post(recommendations::rate))
}

/// Handler listing every cached movie, newest first
async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<MovieResponse>>> {
    let movies = movies::list_movies(&state.db).await?;
    Ok(Json(movies.iter().map(MovieResponse::from).collect()))
}

/// Handler for one cached movie
async fn detail(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MovieResponse>> {
    let movie = movies::get_movie(&state.db, id).await?;
    Ok(Json(MovieResponse::from(&movie)))
}

#[derive(Debug, Deserialize)]
struct RecommendRequest {
    #[serde(default)]
    mood_id: Option<i64>,
}

/// Handler for the recommendation flow: mood in, movies + history ids out
async fn recommend(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<RecommendResponse>> {
    let mood_id = request
        .mood_id
        .ok_or_else(|| AppError::Validation("mood_id is required".to_string()))?;

    let batch =
        recommendation_flow::recommend(&state.db, state.provider.as_ref(), &user, mood_id).await?;

    let movies: Vec<MovieResponse> = batch.movies.iter().map(MovieResponse::from).collect();
    let count = movies.len();
    Ok(Json(RecommendResponse {
        mood: batch.mood,
        movies,
        recommendations: batch.recommendation_ids,
        count,
    }))
}
