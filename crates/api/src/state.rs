use std::sync::Arc;

use fastlane_pipeline::Pipeline;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// The ingestion pipeline; holds the long-lived collaborator handles.
    pub pipeline: Arc<Pipeline>,
    /// Read by [`crate::app`] for the request timeout and reported on `/health`.
    pub config: Arc<ServerConfig>,
}
