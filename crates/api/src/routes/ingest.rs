//! Storage-object event endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use fastlane_core::event::ObjectReference;
use fastlane_pipeline::IngestionReport;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /
///
/// Runs the pipeline once for the object named in the event.
async fn ingest(
    State(state): State<AppState>,
    payload: Result<Json<ObjectReference>, JsonRejection>,
) -> AppResult<Json<DataResponse<IngestionReport>>> {
    let Json(event) = payload?;
    let report = state.pipeline.run(&event).await?;

    Ok(Json(DataResponse { data: report }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(ingest))
}
