/*
 * Responsibility
 * - HTTP-facing AppError
 * - IntoResponse (status + JSON error body)
 * - ResolveError -> AppError, hiding the identifier outside development
 * - JsonRejection -> AppError, so malformed bodies get the same error shape
 */
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::AppEnv;
use crate::services::auth::ResolveError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Translate a resolve failure into an authentication failure.
    ///
    /// Production responses never echo the identifier back.
    pub fn from_resolve(err: ResolveError, app_env: AppEnv) -> Self {
        match err {
            ResolveError::NotFound { .. } if app_env.is_production() => {
                AppError::unauthorized("invalid credentials")
            }
            e @ ResolveError::NotFound { .. } => AppError::unauthorized(e.to_string()),
            ResolveError::Provider(source) => {
                tracing::error!(error = ?source, "principal resolution failed");
                AppError::Internal
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "payload too large".into(),
            ),
            AppError::Unauthorized { message } => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // Body-limit failures keep their 413; everything else is the client's JSON.
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge;
        }
        AppError::bad_request("INVALID_REQUEST", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::error::RepoError;

    #[test]
    fn not_found_is_generic_in_production() {
        let err = AppError::from_resolve(
            ResolveError::not_found("ghost@example.com"),
            AppEnv::Production,
        );

        match err {
            AppError::Unauthorized { message } => assert_eq!(message, "invalid credentials"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn not_found_names_identifier_in_development() {
        let err = AppError::from_resolve(
            ResolveError::not_found("ghost@example.com"),
            AppEnv::Development,
        );

        match err {
            AppError::Unauthorized { message } => {
                assert_eq!(message, "user not found with email: ghost@example.com")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_request_keeps_code_and_message() {
        let res = AppError::bad_request("INVALID_REQUEST", "missing field").into_response();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn provider_failure_is_internal() {
        let err = AppError::from_resolve(
            ResolveError::Provider(RepoError::Db(sqlx::Error::PoolClosed)),
            AppEnv::Development,
        );

        assert!(matches!(err, AppError::Internal));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
