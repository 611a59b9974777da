/// Recommendation history, always scoped to its owner.
///
/// Every query filters on `user_id`, so a recommendation belonging to
/// another user is indistinguishable from one that does not exist.
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use crate::{
    error::{AppError, AppResult},
    models::{Mood, MovieResponse, RecommendationResponse},
};

const NOT_FOUND: &str = "Recommendation not found";

/// Columns of the recommendation joined with its movie, mood and owner.
const VIEW_SELECT: &str = r#"
SELECT r.id, u.username, r.recommended_at, r.viewed, r.user_rating,
       m.id AS movie_id, m.title AS movie_title, m.overview AS movie_overview,
       m.release_date AS movie_release_date, m.poster_url AS movie_poster_url,
       m.backdrop_url AS movie_backdrop_url, m.rating AS movie_rating,
       m.tmdb_id AS movie_tmdb_id, m.created_at AS movie_created_at,
       d.id AS mood_id, d.name AS mood_name, d.description AS mood_description,
       d.emoji AS mood_emoji, d.is_active AS mood_is_active,
       d.created_at AS mood_created_at
FROM recommendations r
JOIN users u ON u.id = r.user_id
JOIN movies m ON m.id = r.movie_id
JOIN moods d ON d.id = r.mood_id
"#;

#[derive(FromRow)]
struct RecommendationRow {
    id: i64,
    username: String,
    recommended_at: DateTime<Utc>,
    viewed: bool,
    user_rating: Option<i32>,
    movie_id: i64,
    movie_title: String,
    movie_overview: String,
    movie_release_date: Option<NaiveDate>,
    movie_poster_url: Option<String>,
    movie_backdrop_url: Option<String>,
    movie_rating: Option<f64>,
    movie_tmdb_id: i64,
    movie_created_at: DateTime<Utc>,
    mood_id: i64,
    mood_name: String,
    mood_description: Option<String>,
    mood_emoji: Option<String>,
    mood_is_active: bool,
    mood_created_at: DateTime<Utc>,
}

impl From<RecommendationRow> for RecommendationResponse {
    fn from(row: RecommendationRow) -> Self {
        Self {
            id: row.id,
            user: row.username,
            movie: MovieResponse {
                id: row.movie_id,
                title: row.movie_title,
                overview: row.movie_overview,
                release_date: row.movie_release_date,
                poster_url: row.movie_poster_url,
                backdrop_url: row.movie_backdrop_url,
                rating: row.movie_rating,
                tmdb_id: row.movie_tmdb_id,
                created_at: row.movie_created_at,
            },
            mood: Mood {
                id: row.mood_id,
                name: row.mood_name,
                description: row.mood_description,
                emoji: row.mood_emoji,
                is_active: row.mood_is_active,
                created_at: row.mood_created_at,
            },
            recommended_at: row.recommended_at,
            viewed: row.viewed,
            user_rating: row.user_rating,
        }
    }
}

/// Appends one history row and returns its id.
pub async fn insert_recommendation(
    pool: &PgPool,
    user_id: i64,
    movie_id: i64,
    mood_id: i64,
) -> AppResult<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO recommendations (user_id, movie_id, mood_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(user_id)
    .bind(movie_id)
    .bind(mood_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Newest first; same-instant rows fall back to insertion order.
pub async fn list_recommendations(
    pool: &PgPool,
    user_id: i64,
    mood_filter: Option<i64>,
) -> AppResult<Vec<RecommendationResponse>> {
    let query = format!(
        "{} WHERE r.user_id = $1 AND ($2::bigint IS NULL OR r.mood_id = $2) \
         ORDER BY r.recommended_at DESC, r.id DESC",
        VIEW_SELECT
    );
    let rows = sqlx::query_as::<_, RecommendationRow>(&query)
        .bind(user_id)
        .bind(mood_filter)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(RecommendationResponse::from).collect())
}

pub async fn get_recommendation(
    pool: &PgPool,
    user_id: i64,
    id: i64,
) -> AppResult<RecommendationResponse> {
    let query = format!("{} WHERE r.user_id = $1 AND r.id = $2", VIEW_SELECT);
    let row = sqlx::query_as::<_, RecommendationRow>(&query)
        .bind(user_id)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;
    Ok(row.into())
}

/// Idempotent: marking an already-viewed row succeeds and changes nothing.
pub async fn mark_viewed(
    pool: &PgPool,
    user_id: i64,
    id: i64,
) -> AppResult<RecommendationResponse> {
    let updated: Option<i64> = sqlx::query_scalar(
        "UPDATE recommendations SET viewed = TRUE WHERE id = $2 AND user_id = $1 RETURNING id",
    )
    .bind(user_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(id) => get_recommendation(pool, user_id, id).await,
        None => Err(AppError::NotFound(NOT_FOUND.to_string())),
    }
}

/// The rating scale is 1-5 inclusive, matching the check constraint.
fn validate_rating(rating: i32) -> AppResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

pub async fn set_rating(
    pool: &PgPool,
    user_id: i64,
    id: i64,
    rating: i32,
) -> AppResult<RecommendationResponse> {
    validate_rating(rating)?;

    let updated: Option<i64> = sqlx::query_scalar(
        "UPDATE recommendations SET user_rating = $3 WHERE id = $2 AND user_id = $1 RETURNING id",
    )
    .bind(user_id)
    .bind(id)
    .bind(rating)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(id) => get_recommendation(pool, user_id, id).await,
        None => Err(AppError::NotFound(NOT_FOUND.to_string())),
    }
}

/// Hard delete; not reversible.
pub async fn delete_recommendation(pool: &PgPool, user_id: i64, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM recommendations WHERE id = $2 AND user_id = $1")
        .bind(user_id)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(6).is_err());
        assert!(validate_rating(-3).is_err());
    }

    #[test]
    fn test_view_row_maps_to_response() {
        let row = RecommendationRow {
            id: 3,
            username: "alice".to_string(),
            recommended_at: Utc::now(),
            viewed: false,
            user_rating: Some(4),
            movie_id: 10,
            movie_title: "Inception".to_string(),
            movie_overview: "Dreams.".to_string(),
            movie_release_date: NaiveDate::from_ymd_opt(2010, 7, 15),
            movie_poster_url: None,
            movie_backdrop_url: None,
            movie_rating: Some(8.4),
            movie_tmdb_id: 27205,
            movie_created_at: Utc::now(),
            mood_id: 1,
            mood_name: "Happy".to_string(),
            mood_description: None,
            mood_emoji: Some("😊".to_string()),
            mood_is_active: true,
            mood_created_at: Utc::now(),
        };

        let response = RecommendationResponse::from(row);
        assert_eq!(response.id, 3);
        assert_eq!(response.user, "alice");
        assert_eq!(response.movie.tmdb_id, 27205);
        assert_eq!(response.mood.name, "Happy");
        assert_eq!(response.user_rating, Some(4));
    }
}
