pub mod error;
pub mod forecast;
pub mod response;
pub mod status;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::config::{Config, ForecastDefaults};
use crate::pipeline::Pipeline;

// Uploads beyond this are rejected before parsing.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Shared per-process state. The pipeline itself is stateless; requests run
/// independently and in parallel.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub defaults: ForecastDefaults,
}

pub fn router(pipeline: Arc<Pipeline>, cfg: &Config) -> Router {
    let state = AppState { pipeline, defaults: cfg.forecast.clone() };

    Router::new()
        .route("/", get(status::root))
        .route("/health", get(status::health))
        .route("/api/v1/forecast", post(forecast::create_forecast))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(60)))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
