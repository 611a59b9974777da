use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{error::AppResult, models::Mood, services::catalog, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/:id", get(detail))
}

/// Handler listing the active mood catalog, sorted by name
async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Mood>>> {
    let moods = catalog::list_active_moods(&state.db).await?;
    Ok(Json(moods))
}

/// Handler for one active mood; inactive ids 404 like missing ones
async fn detail(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Mood>> {
    let mood = catalog::get_active_mood(&state.db, id).await?;
    Ok(Json(mood))
}
