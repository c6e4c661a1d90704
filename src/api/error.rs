use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::response::ApiResponse;
use crate::error::PipelineError;

/// API error types returned from handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::InternalError(_) => tracing::error!(error = %self, "API error occurred"),
            ApiError::BadRequest(_) => tracing::debug!(error = %self, "Client error"),
        }

        // Errors ride the same envelope as successes, so clients always
        // branch on `success`.
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            // Input defects the caller can fix by correcting the file or
            // the query.
            PipelineError::Normalize(_)
            | PipelineError::Parse { .. }
            | PipelineError::EmptySeries
            | PipelineError::InvalidHorizon => ApiError::BadRequest(err.to_string()),
            // Oracle failures are opaque and terminal for the request.
            PipelineError::Oracle(_) => ApiError::InternalError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InternalError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_rides_the_envelope() {
        let response = ApiError::BadRequest("bad csv".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("bad csv"));
    }

    #[test]
    fn test_pipeline_error_mapping() {
        let api: ApiError = PipelineError::from(NormalizeError::DateColumnNotFound).into();
        assert_eq!(api.status_code(), StatusCode::BAD_REQUEST);

        let api: ApiError = PipelineError::Oracle(anyhow::anyhow!("model diverged")).into();
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
