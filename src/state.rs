use std::sync::Arc;

use sqlx::PgPool;

use crate::services::providers::MovieProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub provider: Arc<dyn MovieProvider>,
}

impl AppState {
    pub fn new(db: PgPool, provider: Arc<dyn MovieProvider>) -> Self {
        Self { db, provider }
    }
}
