/// Movie repository: maps raw TMDB records onto local rows and keeps one row
/// per `tmdb_id` via the database's conflict resolution.
use chrono::NaiveDate;
use sqlx::{types::Json, PgPool};

use crate::{
    error::{AppError, AppResult},
    models::{Movie, ProviderMovie},
};

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const BACKDROP_BASE_URL: &str = "https://image.tmdb.org/t/p/w1280";

/// Absent or empty paths become None, never an empty-string URL.
fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", base, p))
}

/// TMDB dates are `YYYY-MM-DD` strings; anything unparsable is treated as
/// unknown rather than an error.
fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// Inserts or fully overwrites the row for this record's `tmdb_id`.
///
/// Concurrent upserts of the same id are serialized by the unique index and
/// `ON CONFLICT` clause; there is no application-level check-then-act.
pub async fn upsert_movie(pool: &PgPool, fetched: &ProviderMovie) -> AppResult<Movie> {
    let record = &fetched.record;
    let poster_url = image_url(POSTER_BASE_URL, record.poster_path.as_deref());
    let backdrop_url = image_url(BACKDROP_BASE_URL, record.backdrop_path.as_deref());
    let release_date = parse_release_date(record.release_date.as_deref());

    let movie = sqlx::query_as::<_, Movie>(
        r#"
        INSERT INTO movies
            (tmdb_id, title, overview, release_date, poster_url, backdrop_url,
             rating, genre_ids, external_api_data)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (tmdb_id) DO UPDATE SET
            title = EXCLUDED.title,
            overview = EXCLUDED.overview,
            release_date = EXCLUDED.release_date,
            poster_url = EXCLUDED.poster_url,
            backdrop_url = EXCLUDED.backdrop_url,
            rating = EXCLUDED.rating,
            genre_ids = EXCLUDED.genre_ids,
            external_api_data = EXCLUDED.external_api_data,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(record.id)
    .bind(&record.title)
    .bind(&record.overview)
    .bind(release_date)
    .bind(poster_url)
    .bind(backdrop_url)
    .bind(record.vote_average)
    .bind(Json(record.genre_ids.clone()))
    .bind(fetched.raw.clone())
    .fetch_one(pool)
    .await?;

    Ok(movie)
}

pub async fn list_movies(pool: &PgPool) -> AppResult<Vec<Movie>> {
    let movies =
        sqlx::query_as::<_, Movie>("SELECT * FROM movies ORDER BY created_at DESC, id DESC")
            .fetch_all(pool)
            .await?;
    Ok(movies)
}

pub async fn get_movie(pool: &PgPool, id: i64) -> AppResult<Movie> {
    sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))
}
