//! Request handlers for the mock analysis endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

use super::canned::analysis_for_tag;
use super::AppState;
use crate::pipeline::analyze::{AnalyzeErrorBody, AnalyzeRequest, AnalyzeResponse};

/// Error text for a body that cannot be parsed.
pub const PROCESS_ERROR: &str = "Failed to process the image";

/// POST /api/analyze
///
/// Waits the configured delay, then answers with the canned analysis for
/// `docType`. The image itself is never inspected.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            error!("Error in analysis route: {}", rejection.body_text());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AnalyzeErrorBody {
                    error: PROCESS_ERROR.to_string(),
                }),
            )
                .into_response();
        }
    };

    debug!(
        "Analysis request: docType={:?}, {} bytes of image data",
        request.doc_type,
        request.image_data.len()
    );

    if state.analysis_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(state.analysis_delay_ms)).await;
    }

    Json(AnalyzeResponse {
        analysis: analysis_for_tag(&request.doc_type).to_string(),
    })
    .into_response()
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
