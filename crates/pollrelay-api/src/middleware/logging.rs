use axum::{extract::Request, http::Method, middleware::Next, response::Response};
use std::time::Instant;

/// Request logging middleware
///
/// Polls arrive several times a second per client, so successful GETs are
/// logged at debug; everything else at info.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    if method == Method::GET && status.is_success() {
        tracing::debug!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request processed"
        );
    } else {
        tracing::info!(
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request processed"
        );
    }

    response
}
