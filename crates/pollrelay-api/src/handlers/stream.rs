use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use pollrelay::{PollResult, SessionRequest, Snapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct StartStreamRequest {
    pub message: String,
    /// Caller's conversation id, forwarded upstream untouched
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartStreamResponse {
    #[serde(rename = "streamId")]
    pub stream_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PollQuery {
    #[serde(default)]
    pub from: usize,
}

/// Start relaying a message upstream
///
/// Responds with the stream id right away; chunks are collected in the
/// background and fetched with `poll_stream`.
pub async fn start_stream(
    State(state): State<Arc<AppState>>,
    body: Result<Json<StartStreamRequest>, JsonRejection>,
) -> ApiResult<Json<StartStreamResponse>> {
    let Json(req) = body?;

    let mut request = SessionRequest::new(req.message);
    if let Some(context) = req.session_id {
        request = request.with_context(context);
    }

    let stream_id = state.relay.start_session(request);

    Ok(Json(StartStreamResponse { stream_id }))
}

/// Fetch the chunks of a stream from the `from` cursor onwards
pub async fn poll_stream(
    State(state): State<Arc<AppState>>,
    Path(stream_id): Path<String>,
    query: Result<Query<PollQuery>, QueryRejection>,
) -> ApiResult<Json<Snapshot>> {
    let Query(query) = query?;

    match state.relay.poll_session(&stream_id, query.from) {
        PollResult::Ok(snapshot) => Ok(Json(snapshot)),
        PollResult::Failed(message) => Err(ApiError::StreamFailed(message)),
        PollResult::NotFound => Err(ApiError::StreamNotFound(stream_id)),
    }
}
