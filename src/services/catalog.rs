/// Mood catalog reads. The catalog is seeded by migration and read-only at
/// runtime; inactive moods are invisible everywhere.
use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::Mood,
};

pub async fn list_active_moods(pool: &PgPool) -> AppResult<Vec<Mood>> {
    let moods =
        sqlx::query_as::<_, Mood>("SELECT * FROM moods WHERE is_active = TRUE ORDER BY name")
            .fetch_all(pool)
            .await?;
    Ok(moods)
}

pub async fn get_active_mood(pool: &PgPool, id: i64) -> AppResult<Mood> {
    sqlx::query_as::<_, Mood>("SELECT * FROM moods WHERE id = $1 AND is_active = TRUE")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Mood not found".to_string()))
}
