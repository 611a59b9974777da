use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

/// Locally cached projection of one TMDB movie record.
///
/// `tmdb_id` is unique: refreshing the same upstream movie overwrites this
/// row instead of inserting a second one.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub release_date: Option<NaiveDate>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub tmdb_id: i64,
    pub rating: Option<f64>,
    pub genre_ids: Json<Vec<i64>>,
    /// Verbatim TMDB payload, kept for fields we do not map yet.
    pub external_api_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-facing movie view (omits the raw payload and genre ids).
#[derive(Debug, Clone, Serialize)]
pub struct MovieResponse {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub release_date: Option<NaiveDate>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub rating: Option<f64>,
    pub tmdb_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            release_date: movie.release_date,
            poster_url: movie.poster_url.clone(),
            backdrop_url: movie.backdrop_url.clone(),
            rating: movie.rating,
            tmdb_id: movie.tmdb_id,
            created_at: movie.created_at,
        }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// The fields of a TMDB discover result we actually consume.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbMovie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

/// One discover result: the typed fields plus the untouched JSON value the
/// provider returned, which is persisted alongside the mapped columns.
#[derive(Debug, Clone)]
pub struct ProviderMovie {
    pub record: TmdbMovie,
    pub raw: serde_json::Value,
}

impl ProviderMovie {
    pub fn from_raw(raw: serde_json::Value) -> Result<Self, serde_json::Error> {
        let record = serde_json::from_value(raw.clone())?;
        Ok(Self { record, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tmdb_movie_deserialization() {
        let payload = json!({
            "id": 27205,
            "title": "Inception",
            "overview": "Cobb, a skilled thief who commits corporate espionage.",
            "release_date": "2010-07-15",
            "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
            "backdrop_path": "/s3TBrRGB1iav7gFOCNx3H31MoES.jpg",
            "vote_average": 8.4,
            "genre_ids": [28, 878, 12],
            "popularity": 83.9,
            "adult": false
        });

        let movie: TmdbMovie = serde_json::from_value(payload).unwrap();
        assert_eq!(movie.id, 27205);
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.release_date.as_deref(), Some("2010-07-15"));
        assert_eq!(movie.genre_ids, vec![28, 878, 12]);
        assert_eq!(movie.vote_average, Some(8.4));
    }

    #[test]
    fn test_tmdb_movie_deserialization_sparse_record() {
        // TMDB omits image paths and dates for obscure entries.
        let payload = json!({ "id": 42 });

        let movie: TmdbMovie = serde_json::from_value(payload).unwrap();
        assert_eq!(movie.id, 42);
        assert_eq!(movie.title, "");
        assert_eq!(movie.poster_path, None);
        assert_eq!(movie.release_date, None);
        assert!(movie.genre_ids.is_empty());
    }

    #[test]
    fn test_provider_movie_keeps_raw_payload_verbatim() {
        let raw = json!({
            "id": 7,
            "title": "Seven",
            "original_language": "en",
            "video": false
        });

        let provider_movie = ProviderMovie::from_raw(raw.clone()).unwrap();
        assert_eq!(provider_movie.record.id, 7);
        // Fields we never map must survive untouched in the raw value.
        assert_eq!(provider_movie.raw, raw);
    }

    #[test]
    fn test_provider_movie_rejects_record_without_id() {
        let raw = json!({ "title": "No id" });
        assert!(ProviderMovie::from_raw(raw).is_err());
    }

    #[test]
    fn test_movie_response_omits_raw_payload() {
        let movie = Movie {
            id: 1,
            title: "Inception".to_string(),
            overview: "A heist in dreams.".to_string(),
            release_date: NaiveDate::from_ymd_opt(2010, 7, 15),
            poster_url: Some("https://image.tmdb.org/t/p/w500/x.jpg".to_string()),
            backdrop_url: None,
            tmdb_id: 27205,
            rating: Some(8.4),
            genre_ids: Json(vec![28, 878]),
            external_api_data: json!({"secret": "stays server side"}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(MovieResponse::from(&movie)).unwrap();
        assert_eq!(value["tmdb_id"], 27205);
        assert_eq!(value["release_date"], "2010-07-15");
        assert!(value.get("external_api_data").is_none());
        assert!(value.get("genre_ids").is_none());
    }
}
