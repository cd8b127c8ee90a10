//! HTTP error responses
//!
//! Maps [`CriticError`] onto status codes and a JSON body of the form
//! `{"error": {"code": "...", "message": "...", "retryable": bool}}`.
//! Internal failures are logged in full but only a generic message reaches
//! the client.

use crate::error::{AssessmentError, CriticError};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Error envelope returned by every failing route
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code such as `INVALID_COORDINATE`
    pub code: String,
    pub message: String,
    /// Whether the same request may succeed later unchanged
    pub retryable: bool,
}

/// Route-level error
#[derive(Debug)]
pub enum ApiError {
    /// Failure raised by the review pipeline
    Review(CriticError),
    /// Request body that is not a valid review request
    Body(JsonRejection),
}

impl From<CriticError> for ApiError {
    fn from(err: CriticError) -> Self {
        Self::Review(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

/// Status code and error code for a pipeline error
pub fn status_and_code(err: &CriticError) -> (StatusCode, &'static str) {
    match err {
        CriticError::InvalidCoordinate(_) => (StatusCode::BAD_REQUEST, "INVALID_COORDINATE"),
        CriticError::RepositoryForbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        CriticError::RepositoryNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        CriticError::Assessment {
            source: AssessmentError::RateLimited,
            ..
        } => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
        CriticError::Assessment { .. } => (StatusCode::BAD_GATEWAY, "ASSESSMENT_FAILED"),
        CriticError::Upstream { .. } | CriticError::UpstreamPayload { .. } => {
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
        }
        CriticError::IncompleteReview { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "INCOMPLETE_REVIEW")
        }
        CriticError::StoreConnect { .. } | CriticError::Store { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Body(rejection) => (rejection.status(), "INVALID_REQUEST", rejection.body_text()),
            Self::Review(err) => {
                let (status, code) = status_and_code(err);
                let message = match err {
                    CriticError::Assessment { source, .. } => source.to_string(),
                    _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
                        "An internal error occurred".to_string()
                    }
                    other => other.to_string(),
                };
                (status, code, message)
            }
        };
        let retryable = matches!(&self, Self::Review(err) if err.is_retryable());

        match &self {
            Self::Review(err) if status.is_server_error() => {
                tracing::error!(error = %err, "review failed")
            }
            Self::Review(err) => tracing::info!(error = %err, "review rejected"),
            Self::Body(rejection) => tracing::info!(error = %rejection, "malformed request"),
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                retryable,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_client_errors() {
        let (status, code) = status_and_code(&CriticError::InvalidCoordinate("x".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "INVALID_COORDINATE");

        let (status, _) = status_and_code(&CriticError::RepositoryNotFound("o/r".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = status_and_code(&CriticError::RepositoryForbidden("o/r".into()));
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn rate_limit_is_429() {
        let err = CriticError::assessment("a.py", AssessmentError::RateLimited);
        assert_eq!(status_and_code(&err).0, StatusCode::TOO_MANY_REQUESTS);

        let err = CriticError::assessment("repository", AssessmentError::Decode("eof".into()));
        assert_eq!(status_and_code(&err), (StatusCode::BAD_GATEWAY, "ASSESSMENT_FAILED"));
    }

    #[test]
    fn unavailable_dependencies_are_503() {
        let err = CriticError::IncompleteReview { failed: 1, total: 3 };
        assert_eq!(status_and_code(&err).0, StatusCode::SERVICE_UNAVAILABLE);

        let err = CriticError::store("set", "repo_abc", "broken pipe");
        assert_eq!(status_and_code(&err).0, StatusCode::SERVICE_UNAVAILABLE);
    }

    async fn error_body(err: CriticError) -> ErrorBody {
        let response = ApiError::from(err).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn transient_failures_are_marked_retryable() {
        let body = error_body(CriticError::store("exists", "repo_abc", "broken pipe")).await;
        assert_eq!(body.error.code, "STORE_UNAVAILABLE");
        assert!(body.error.retryable);

        let body = error_body(CriticError::assessment("a.py", AssessmentError::RateLimited)).await;
        assert!(body.error.retryable);

        let body = error_body(CriticError::RepositoryNotFound("octo/demo".into())).await;
        assert!(!body.error.retryable);
    }

    #[tokio::test]
    async fn internal_message_is_hidden() {
        let body = error_body(CriticError::Internal("secret detail".into())).await;
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert_eq!(body.error.message, "An internal error occurred");
    }

    #[test]
    fn internal_error_is_500() {
        let err = CriticError::Internal("secret detail".into());
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
