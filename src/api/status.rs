use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// GET / - service liveness, mirrors what dashboards poll.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse { status: "Backend is running" })
}

/// GET /health
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok" })
}
