use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::{
    error::{AppError, AppResult},
    models::User,
    services::accounts,
    state::AppState,
};

/// Session key holding the authenticated user's id.
pub const SESSION_USER_KEY: &str = "user_id";

/// Extractor for the authenticated user.
///
/// Resolves the session cookie to an active user row. Fails with a 401 when
/// there is no session, the session carries no user id, or the user has been
/// deactivated since login.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> AppResult<Self> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, err)| AppError::Internal(format!("Session extraction failed: {err}")))?;

        let user_id: i64 = session
            .get(SESSION_USER_KEY)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let user = accounts::find_active_user(&state.db, user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser(user))
    }
}
