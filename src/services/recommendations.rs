/// The recommendation flow: validate the mood, fetch from the provider,
/// upsert each movie, and append one history row per movie.
use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{Mood, Movie, ProviderMovie, User},
    services::{catalog, history, movies, providers::MovieProvider},
};

/// How many movies one recommendation request produces.
pub const DEFAULT_RECOMMENDATION_COUNT: usize = 2;

/// Result of one successful recommendation request. `recommendation_ids`
/// and `movies` are index-aligned and follow the provider's result order.
#[derive(Debug)]
pub struct RecommendationBatch {
    pub mood: Mood,
    pub movies: Vec<Movie>,
    pub recommendation_ids: Vec<i64>,
}

/// Fetches movies for a mood and rejects an empty result page.
///
/// An empty page is a 404 ("nothing matched"), distinct from the provider
/// being unreachable, which surfaces as a server error.
pub async fn fetch_mood_movies(
    provider: &dyn MovieProvider,
    mood_name: &str,
    count: usize,
) -> AppResult<Vec<ProviderMovie>> {
    let fetched = provider.fetch_by_mood(mood_name, count).await?;
    if fetched.is_empty() {
        return Err(AppError::NotFound(
            "No movies found for this mood".to_string(),
        ));
    }
    Ok(fetched)
}

/// Runs the whole flow for one (user, mood) request.
///
/// Persistence is per-item: when item N fails, items 1..N stay in the
/// database and the request fails as a whole. The history rows from the
/// partial batch remain visible.
pub async fn recommend(
    pool: &PgPool,
    provider: &dyn MovieProvider,
    user: &User,
    mood_id: i64,
) -> AppResult<RecommendationBatch> {
    let mood = catalog::get_active_mood(pool, mood_id).await?;
    let fetched = fetch_mood_movies(provider, &mood.name, DEFAULT_RECOMMENDATION_COUNT).await?;

    let mut batch_movies = Vec::with_capacity(fetched.len());
    let mut recommendation_ids = Vec::with_capacity(fetched.len());

    for item in &fetched {
        let movie = movies::upsert_movie(pool, item).await?;
        let recommendation_id =
            history::insert_recommendation(pool, user.id, movie.id, mood.id).await?;
        batch_movies.push(movie);
        recommendation_ids.push(recommendation_id);
    }

    tracing::info!(
        user_id = user.id,
        mood = %mood.name,
        provider = provider.name(),
        count = batch_movies.len(),
        "Recommendations created"
    );

    Ok(RecommendationBatch {
        mood,
        movies: batch_movies,
        recommendation_ids,
    })
}
