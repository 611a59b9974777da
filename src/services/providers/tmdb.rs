/// TMDB discover-movies provider
///
/// Maps a mood name onto a TMDB genre filter and fetches one page of
/// popularity-sorted movies. The API key is looked up per call rather than
/// at startup: a deployment without a key still serves everything except
/// recommendations.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::ProviderMovie,
    services::providers::MovieProvider,
};

/// Upper bound on one discover call; there is no retry behind it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fallback genre for mood names missing from the mapping table.
const DEFAULT_GENRE: i64 = 18; // Drama

/// Genre ids per seeded mood. Only the first entry of a mapping is sent to
/// TMDB; the rest document the intent of the mood.
fn genres_for_mood(mood_name: &str) -> &'static [i64] {
    match mood_name {
        "Happy" => &[35, 16],          // Comedy, Animation
        "Sad" => &[18, 10749],         // Drama, Romance
        "Excited" => &[28, 12, 53],    // Action, Adventure, Thriller
        "Relaxed" => &[18, 99, 10751], // Drama, Documentary, Family
        "Romantic" => &[10749, 18],    // Romance, Drama
        _ => &[DEFAULT_GENRE],
    }
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: Option<String>, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    /// The key is validated here, on every call, so that a missing or empty
    /// key fails before any request is issued.
    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::Configuration("TMDB_API_KEY is not configured".to_string()))
    }
}

#[async_trait::async_trait]
impl MovieProvider for TmdbProvider {
    async fn fetch_by_mood(&self, mood_name: &str, count: usize) -> AppResult<Vec<ProviderMovie>> {
        let api_key = self.api_key()?;
        let genres = genres_for_mood(mood_name);
        // TMDB can OR genres with '|'; a single genre keeps results focused.
        let genre = genres[0];
        let genre_param = genre.to_string();

        let url = format!("{}/discover/movie", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[
                ("api_key", api_key),
                ("with_genres", genre_param.as_str()),
                ("sort_by", "popularity.desc"),
                ("page", "1"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("TMDB request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        #[derive(Deserialize)]
        struct DiscoverResponse {
            #[serde(default)]
            results: Vec<serde_json::Value>,
        }

        let payload: DiscoverResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to parse TMDB response: {}", e)))?;

        let mut movies = Vec::with_capacity(count);
        for raw in payload.results.into_iter().take(count) {
            let movie = ProviderMovie::from_raw(raw)
                .map_err(|e| AppError::Provider(format!("Unexpected TMDB movie shape: {}", e)))?;
            movies.push(movie);
        }

        tracing::info!(
            mood = %mood_name,
            genre,
            results = movies.len(),
            provider = "tmdb",
            "Discover fetch completed"
        );

        Ok(movies)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    #[test]
    fn test_genres_for_seeded_moods() {
        assert_eq!(genres_for_mood("Happy"), &[35, 16]);
        assert_eq!(genres_for_mood("Sad"), &[18, 10749]);
        assert_eq!(genres_for_mood("Excited"), &[28, 12, 53]);
        assert_eq!(genres_for_mood("Relaxed"), &[18, 99, 10751]);
        assert_eq!(genres_for_mood("Romantic"), &[10749, 18]);
    }

    #[test]
    fn test_unknown_mood_falls_back_to_drama() {
        assert_eq!(genres_for_mood("Melancholic"), &[18]);
        assert_eq!(genres_for_mood(""), &[18]);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        // The URL is unroutable on purpose: a configuration error must be
        // raised before the client ever dials out.
        let provider = TmdbProvider::new(None, "http://127.0.0.1:1".to_string());
        let err = provider.fetch_by_mood("Happy", 2).await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));

        let provider = TmdbProvider::new(Some(String::new()), "http://127.0.0.1:1".to_string());
        let err = provider.fetch_by_mood("Happy", 2).await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    /// Serves one canned response body on /discover/movie and records the
    /// query parameters of the last request.
    async fn spawn_stub(
        body: Value,
        seen: Arc<Mutex<Option<HashMap<String, String>>>>,
    ) -> String {
        let app = Router::new().route(
            "/discover/movie",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let body = body.clone();
                let seen = seen.clone();
                async move {
                    *seen.lock().unwrap() = Some(params);
                    Json(body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_truncates_to_count_and_keeps_order() {
        let seen = Arc::new(Mutex::new(None));
        let body = json!({
            "page": 1,
            "results": [
                { "id": 101, "title": "First", "genre_ids": [35] },
                { "id": 202, "title": "Second", "genre_ids": [35] },
                { "id": 303, "title": "Third", "genre_ids": [35] }
            ],
            "total_pages": 40
        });
        let base_url = spawn_stub(body, seen.clone()).await;

        let provider = TmdbProvider::new(Some("test_key".to_string()), base_url);
        let movies = provider.fetch_by_mood("Happy", 2).await.unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].record.id, 101);
        assert_eq!(movies[1].record.id, 202);
        assert_eq!(movies[0].raw["title"], "First");

        let params = seen.lock().unwrap().clone().unwrap();
        assert_eq!(params.get("api_key").map(String::as_str), Some("test_key"));
        assert_eq!(params.get("with_genres").map(String::as_str), Some("35"));
        assert_eq!(
            params.get("sort_by").map(String::as_str),
            Some("popularity.desc")
        );
        assert_eq!(params.get("page").map(String::as_str), Some("1"));
    }

    #[tokio::test]
    async fn test_fetch_with_empty_result_page() {
        let seen = Arc::new(Mutex::new(None));
        let base_url = spawn_stub(json!({ "page": 1, "results": [] }), seen).await;

        let provider = TmdbProvider::new(Some("test_key".to_string()), base_url);
        let movies = provider.fetch_by_mood("Sad", 2).await.unwrap();
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_record_is_a_provider_error() {
        let seen = Arc::new(Mutex::new(None));
        let base_url = spawn_stub(json!({ "results": [ { "title": "no id" } ] }), seen).await;

        let provider = TmdbProvider::new(Some("test_key".to_string()), base_url);
        let err = provider.fetch_by_mood("Happy", 2).await.unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_a_provider_error() {
        let app = Router::new().route(
            "/discover/movie",
            get(|| async {
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "upstream down",
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let provider =
            TmdbProvider::new(Some("test_key".to_string()), format!("http://{}", addr));
        let err = provider.fetch_by_mood("Happy", 2).await.unwrap_err();
        match err {
            AppError::Provider(msg) => assert!(msg.contains("500")),
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_a_provider_error() {
        let provider = TmdbProvider::new(
            Some("test_key".to_string()),
            "http://127.0.0.1:1".to_string(),
        );
        let err = provider.fetch_by_mood("Happy", 2).await.unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
    }
}
