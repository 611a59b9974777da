use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Mood, MovieResponse};

/// One history entry as returned to its owner: the row itself plus the
/// movie and mood it points at.
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub id: i64,
    /// Username of the owner.
    pub user: String,
    pub movie: MovieResponse,
    pub mood: Mood,
    pub recommended_at: DateTime<Utc>,
    pub viewed: bool,
    pub user_rating: Option<i32>,
}

/// Response of POST /movies/recommend: the mood, the fetched movies in
/// provider order, and the ids of the recommendation rows just created,
/// in the same order.
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub mood: Mood,
    pub movies: Vec<MovieResponse>,
    pub recommendations: Vec<i64>,
    pub count: usize,
}
