//! Token authentication.
//!
//! # Responsibility
//! - Resolve `Authorization: Token <key>` (or `Bearer <key>`) to an account.
//! - Serve the credential exchange endpoint `POST /token/`.
//!
//! # Invariants
//! - Resource handlers take `Authenticated` first, so a request without valid
//!   credentials is rejected before any entity data is read or written.

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::SharedState;
use axum::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use geoconnector_core::model::account::Account;
use geoconnector_core::repo::account_repo::SqliteAccountRepository;
use geoconnector_core::{AuthError, AuthService};
use log::info;
use serde::{Deserialize, Serialize};

/// Account behind a valid API token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Account);

#[async_trait]
impl FromRequestParts<SharedState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let key = extract_token(&parts.headers)?;

        let account = state.with_conn(|conn| {
            AuthService::new(SqliteAccountRepository::new(conn))
                .authenticate(&key)
                .map_err(|err| match err {
                    AuthError::InvalidToken => {
                        ApiError::Unauthorized("Invalid token.".to_string())
                    }
                    AuthError::InactiveAccount => {
                        ApiError::Unauthorized("User inactive or deleted.".to_string())
                    }
                    other => ApiError::from(other),
                })
        })?;

        Ok(Self(account))
    }
}

fn extract_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let not_provided =
        || ApiError::Unauthorized("Authentication credentials were not provided.".to_string());

    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(not_provided)?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid token header.".to_string()))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().ok_or_else(not_provided)?;
    if !scheme.eq_ignore_ascii_case("token") && !scheme.eq_ignore_ascii_case("bearer") {
        return Err(not_provided());
    }
    match (parts.next(), parts.next()) {
        (Some(key), None) => Ok(key.to_string()),
        (None, _) => Err(ApiError::Unauthorized(
            "Invalid token header. No credentials provided.".to_string(),
        )),
        (Some(_), Some(_)) => Err(ApiError::Unauthorized(
            "Invalid token header. Token string should not contain spaces.".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Exchanges a username/password pair for the account's API token.
pub async fn obtain_token(
    State(state): State<SharedState>,
    JsonBody(request): JsonBody<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.with_conn(|conn| {
        AuthService::new(SqliteAccountRepository::new(conn))
            .issue_token(&request.username, &request.password)
            .map_err(ApiError::from)
    })?;

    info!(
        "event=token_issue module=api status=ok account_id={}",
        token.account_id
    );
    Ok(Json(TokenResponse { token: token.key }))
}
