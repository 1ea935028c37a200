use axum::http::StatusCode;

/// Acknowledges arbitrary probe requests (favicon, health checks) with an
/// empty 200 so they never disturb the pending callback.
pub async fn root() -> StatusCode {
    StatusCode::OK
}
