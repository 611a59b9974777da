/// Movie metadata provider abstraction
///
/// The recommendation flow only needs one operation from the outside world:
/// "give me popular movies matching this mood". Keeping it behind a trait
/// lets tests substitute a canned provider and keeps TMDB specifics out of
/// the orchestrator.
use crate::{error::AppResult, models::ProviderMovie};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Fetch up to `count` popularity-sorted movies for a mood name.
    ///
    /// Returns records in provider order; the orchestrator preserves that
    /// order end to end. One shot: no retries, no pagination.
    async fn fetch_by_mood(&self, mood_name: &str, count: usize) -> AppResult<Vec<ProviderMovie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
