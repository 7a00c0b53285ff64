//! HTTP route exposing the transcript pipeline.
//!
//! `POST /api/transcribe` takes `{ "url": "..." }` and answers with
//! `{ "transcriptions": [...] }`, `400` when the URL is missing, or `500` on any failure,
//! including a body that is not a JSON object with a string `url`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::output::TranscriptEnvelope;
use crate::transcribe::TranscriptPipeline;

#[derive(Debug, Deserialize)]
pub struct TranscribeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn router(pipeline: Arc<TranscriptPipeline>) -> Router {
    Router::new()
        .route("/api/transcribe", post(transcribe))
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}

/// Bind and serve until the process is stopped
pub async fn serve(pipeline: Arc<TranscriptPipeline>, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(pipeline)).await?;
    Ok(())
}

/// POST /api/transcribe
pub async fn transcribe(
    State(pipeline): State<Arc<TranscriptPipeline>>,
    payload: Result<Json<TranscribeRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected transcribe request body: {}", rejection.body_text());
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, TRANSCRIBE_FAILED);
        }
    };

    let Some(url) = request.url.filter(|url| !url.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Video URL not provided");
    };

    match pipeline.fetch_transcript(&url).await {
        Ok(result) => Json(TranscriptEnvelope {
            transcriptions: &result.entries,
        })
        .into_response(),
        Err(err) => {
            error!("Failed to transcribe video {}: {}", url, err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, TRANSCRIBE_FAILED)
        }
    }
}

const TRANSCRIBE_FAILED: &str = "Failed to transcribe video";

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}
