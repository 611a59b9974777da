pub mod mood;
pub mod movie;
pub mod recommendation;
pub mod user;

pub use mood::Mood;
pub use movie::{Movie, MovieResponse, ProviderMovie, TmdbMovie};
pub use recommendation::{RecommendResponse, RecommendationResponse};
pub use user::{ProfileResponse, User, UserResponse};
