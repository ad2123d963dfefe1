use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod ingest;

/// All routes of the service.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(ingest::router())
}
