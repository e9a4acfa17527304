//! Account registration and opaque token authentication.
//!
//! # Responsibility
//! - Register accounts with hashed passwords.
//! - Exchange credentials for a per-account token (get-or-create).
//! - Resolve presented token keys to active accounts.
//!
//! # Invariants
//! - Plain-text passwords are never stored or logged.
//! - Repeated exchanges for one account return the same key.
//! - Inactive accounts can neither obtain nor use tokens.

use crate::model::account::{Account, AuthToken};
use crate::model::validation::{require_text, ValidationError};
use crate::repo::account_repo::AccountRepository;
use crate::repo::RepoError;
use crate::service::password::{hash_password, verify_password};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug)]
pub enum AuthError {
    /// Username/password pair did not match an account.
    InvalidCredentials,
    /// Presented token key is unknown.
    InvalidToken,
    InactiveAccount,
    DuplicateUsername(String),
    Validation(ValidationError),
    Hashing(String),
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => {
                write!(f, "unable to log in with provided credentials")
            }
            Self::InvalidToken => write!(f, "invalid token"),
            Self::InactiveAccount => write!(f, "user inactive or deleted"),
            Self::DuplicateUsername(username) => {
                write!(f, "account `{username}` already exists")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Hashing(message) => write!(f, "{message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ValidationError> for AuthError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Use-case service for API accounts.
pub struct AuthService<R: AccountRepository> {
    repo: R,
}

impl<R: AccountRepository> AuthService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an active account.
    pub fn register(&self, username: &str, password: &str) -> AuthResult<Account> {
        let username = username.trim();
        require_text("username", username)?;
        if password.is_empty() {
            return Err(ValidationError::Blank { field: "password" }.into());
        }
        if self.repo.find_by_username(username)?.is_some() {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let hash = hash_password(password).map_err(AuthError::Hashing)?;
        let account = self
            .repo
            .create_account(username, &hash)
            .map_err(|err| match err {
                RepoError::Duplicate { .. } => AuthError::DuplicateUsername(username.to_string()),
                other => AuthError::Repo(other),
            })?;

        info!(
            "event=account_create module=auth status=ok account_id={}",
            account.id
        );
        Ok(account)
    }

    /// Exchanges credentials for the account's token, creating it on first use.
    pub fn issue_token(&self, username: &str, password: &str) -> AuthResult<AuthToken> {
        let Some(account) = self.repo.find_by_username(username.trim())? else {
            warn!("event=token_issue module=auth status=error reason=unknown_user");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &account.password_hash).map_err(AuthError::Hashing)? {
            warn!(
                "event=token_issue module=auth status=error reason=bad_password account_id={}",
                account.id
            );
            return Err(AuthError::InvalidCredentials);
        }
        if !account.is_active {
            return Err(AuthError::InactiveAccount);
        }

        if let Some(token) = self.repo.token_for_account(account.id)? {
            return Ok(token);
        }
        let key = Uuid::new_v4().simple().to_string();
        let token = self.repo.insert_token(account.id, &key)?;
        info!(
            "event=token_issue module=auth status=ok account_id={}",
            account.id
        );
        Ok(token)
    }

    /// Resolves a token key to its active account.
    pub fn authenticate(&self, key: &str) -> AuthResult<Account> {
        let Some((_, account)) = self.repo.find_token(key)? else {
            return Err(AuthError::InvalidToken);
        };
        if !account.is_active {
            return Err(AuthError::InactiveAccount);
        }
        Ok(account)
    }
}
