//! HTTP error mapping.
//!
//! Every failure leaves the API as `{"detail": "<message>"}` with the status
//! code of its class. Storage faults are logged and reported as 500.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use geoconnector_core::{AuthError, FilterError, RepoError};
use log::error;
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid credentials.
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn not_found() -> Self {
        Self::NotFound("Not found.".to_string())
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized(message)
            | Self::BadRequest(message)
            | Self::NotFound(message)
            | Self::Internal(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ApiError {}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(_)
            | RepoError::MissingReference { .. }
            | RepoError::UnknownName { .. }
            | RepoError::AmbiguousName { .. }
            | RepoError::Duplicate { .. } => Self::BadRequest(value.to_string()),
            RepoError::NotFound { .. } => Self::not_found(),
            RepoError::Db(_) | RepoError::InvalidData(_) => Self::Internal(value.to_string()),
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(value: FilterError) -> Self {
        Self::BadRequest(value.to_string())
    }
}

/// Credential exchange failures are request errors; token failures are 401.
impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidCredentials
            | AuthError::InactiveAccount
            | AuthError::DuplicateUsername(_)
            | AuthError::Validation(_) => Self::BadRequest(value.to_string()),
            AuthError::InvalidToken => Self::Unauthorized(value.to_string()),
            AuthError::Hashing(_) | AuthError::Repo(_) => Self::Internal(value.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match &self {
            Self::Internal(message) => {
                error!("event=http_error module=api status=error error={message}");
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Token"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use geoconnector_core::RepoError;

    #[test]
    fn repo_errors_map_to_request_classes() {
        let duplicate = ApiError::from(RepoError::Duplicate {
            entity: "point",
            field: "geolocation",
        });
        assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);

        let missing = ApiError::from(RepoError::NotFound {
            entity: "point",
            id: 3,
        });
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let unknown = ApiError::from(RepoError::UnknownName {
            field: "linked_resources",
            name: "gas".to_string(),
        });
        assert_eq!(unknown.status_code(), StatusCode::BAD_REQUEST);

        let corrupt = ApiError::from(RepoError::InvalidData("bad flag".to_string()));
        assert_eq!(corrupt.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthorized_response_carries_challenge_header() {
        let response = ApiError::Unauthorized("Invalid token.".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Token"
        );
    }
}
