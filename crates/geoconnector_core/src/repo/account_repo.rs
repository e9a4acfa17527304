//! Account and API token persistence.
//!
//! # Invariants
//! - Usernames are unique.
//! - An account holds at most one token; keys are unique.

use crate::model::account::{Account, AuthToken};
use crate::model::RecordId;
use crate::repo::{bool_to_int, map_constraint, parse_flag, RepoError, RepoResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ACCOUNT_SELECT_SQL: &str = "SELECT
    id,
    username,
    password_hash,
    is_active,
    created
FROM accounts";

/// Storage contract for API accounts and their tokens.
pub trait AccountRepository {
    fn create_account(&self, username: &str, password_hash: &str) -> RepoResult<Account>;
    fn get_account(&self, id: RecordId) -> RepoResult<Option<Account>>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>>;
    fn set_active(&self, id: RecordId, is_active: bool) -> RepoResult<()>;
    fn token_for_account(&self, account_id: RecordId) -> RepoResult<Option<AuthToken>>;
    fn insert_token(&self, account_id: RecordId, key: &str) -> RepoResult<AuthToken>;
    /// Resolves a token key to the token and its owning account.
    fn find_token(&self, key: &str) -> RepoResult<Option<(AuthToken, Account)>>;
}

pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create_account(&self, username: &str, password_hash: &str) -> RepoResult<Account> {
        self.conn
            .execute(
                "INSERT INTO accounts (username, password_hash, is_active, created)
                 VALUES (?1, ?2, 1, ?3);",
                params![username, password_hash, Utc::now()],
            )
            .map_err(|err| map_constraint(err, "account", "username"))?;

        let id = self.conn.last_insert_rowid();
        self.get_account(id)?
            .ok_or(RepoError::NotFound {
                entity: "account",
                id,
            })
    }

    fn get_account(&self, id: RecordId) -> RepoResult<Option<Account>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACCOUNT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_account_row(row)?));
        }
        Ok(None)
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACCOUNT_SELECT_SQL} WHERE username = ?1;"))?;
        let mut rows = stmt.query([username])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_account_row(row)?));
        }
        Ok(None)
    }

    fn set_active(&self, id: RecordId, is_active: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE accounts SET is_active = ?1 WHERE id = ?2;",
            params![bool_to_int(is_active), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "account",
                id,
            });
        }
        Ok(())
    }

    fn token_for_account(&self, account_id: RecordId) -> RepoResult<Option<AuthToken>> {
        let token = self
            .conn
            .query_row(
                "SELECT key, account_id, created FROM auth_tokens WHERE account_id = ?1;",
                [account_id],
                parse_token_row,
            )
            .optional()?;
        Ok(token)
    }

    fn insert_token(&self, account_id: RecordId, key: &str) -> RepoResult<AuthToken> {
        let created = Utc::now();
        self.conn
            .execute(
                "INSERT INTO auth_tokens (key, account_id, created) VALUES (?1, ?2, ?3);",
                params![key, account_id, created],
            )
            .map_err(|err| map_constraint(err, "token", "account"))?;

        self.token_for_account(account_id)?
            .ok_or(RepoError::NotFound {
                entity: "account",
                id: account_id,
            })
    }

    fn find_token(&self, key: &str) -> RepoResult<Option<(AuthToken, Account)>> {
        let token = self
            .conn
            .query_row(
                "SELECT key, account_id, created FROM auth_tokens WHERE key = ?1;",
                [key],
                parse_token_row,
            )
            .optional()?;

        let Some(token) = token else {
            return Ok(None);
        };
        let account = self.get_account(token.account_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "token references missing account {}",
                token.account_id
            ))
        })?;
        Ok(Some((token, account)))
    }
}

fn parse_account_row(row: &Row<'_>) -> RepoResult<Account> {
    Ok(Account {
        id: row.get("id")?,
        username: row.get("username")?,
        password_hash: row.get("password_hash")?,
        is_active: parse_flag(row, "accounts", "is_active")?,
        created: row.get("created")?,
    })
}

fn parse_token_row(row: &Row<'_>) -> rusqlite::Result<AuthToken> {
    Ok(AuthToken {
        key: row.get(0)?,
        account_id: row.get(1)?,
        created: row.get(2)?,
    })
}
