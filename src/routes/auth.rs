use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;

use crate::{
    error::AppResult,
    middleware::{auth::SESSION_USER_KEY, CurrentUser},
    models::{ProfileResponse, UserResponse},
    services::accounts::{self, ProfileUpdate, Registration},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/profile", get(get_profile).put(update_profile))
}

/// Handler for user registration
async fn register(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let user = accounts::register(&state.db, &registration).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": UserResponse::from(&user),
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Handler for user login; rotates the session id before storing the user.
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(credentials): Json<LoginRequest>,
) -> AppResult<Json<Value>> {
    let user = accounts::authenticate(&state.db, &credentials.username, &credentials.password)
        .await?;

    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user.id).await?;

    tracing::info!(user_id = user.id, username = %user.username, "Login successful");

    Ok(Json(json!({
        "message": "Login successful",
        "user": UserResponse::from(&user),
    })))
}

/// Handler for logout; drops the whole session server-side.
async fn logout(_user: CurrentUser, session: Session) -> AppResult<Json<Value>> {
    session.flush().await?;
    Ok(Json(json!({ "message": "Logout successful" })))
}

/// Handler returning the caller's own profile
async fn get_profile(CurrentUser(user): CurrentUser) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(&user))
}

/// Handler for partial profile updates (username stays read-only)
async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> AppResult<Json<Value>> {
    let updated = accounts::update_profile(&state.db, user.id, &update).await?;
    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": ProfileResponse::from(&updated),
    })))
}
