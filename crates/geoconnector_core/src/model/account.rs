//! API account and token models.

use super::base::RecordId;
use chrono::{DateTime, Utc};

/// A caller allowed to obtain an API token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: RecordId,
    pub username: String,
    /// PHC-formatted argon2 hash.
    pub password_hash: String,
    pub is_active: bool,
    pub created: DateTime<Utc>,
}

/// Opaque bearer credential bound to one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub key: String,
    pub account_id: RecordId,
    pub created: DateTime<Utc>,
}
