//! Repository layer: persistence contracts, SQLite implementations and the
//! referential-integrity checks performed at write time.
//!
//! # Responsibility
//! - Provide one CRUD + filtered-list contract (`Repository`) for every entity.
//! - Translate store failures into semantic errors (`NotFound`, `Duplicate`,
//!   `MissingReference`) so callers never inspect SQLite codes.
//!
//! # Invariants
//! - Write paths validate drafts before SQL mutations.
//! - Referenced rows are checked for existence before insert/update.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::{RecordId, RecordMeta, ValidationError};
use rusqlite::{Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_repo;
pub mod element_repo;
pub mod filter;
pub mod link_status_repo;
pub mod location_repo;
pub mod point_element_repo;
pub mod point_repo;
pub mod resource_link_repo;

pub use filter::{FilterError, FilterField, FilterKind, FilterSet};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entity persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound {
        entity: &'static str,
        id: RecordId,
    },
    /// A write referenced a row that does not exist.
    MissingReference {
        field: &'static str,
        id: RecordId,
    },
    /// A write named a row that no stored row carries.
    UnknownName {
        field: &'static str,
        name: String,
    },
    /// A write named a row by a name several stored rows share.
    AmbiguousName {
        field: &'static str,
        name: String,
    },
    /// A write collided with a unique column.
    Duplicate {
        entity: &'static str,
        field: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::MissingReference { field, id } => {
                write!(f, "invalid `{field}`: object {id} does not exist")
            }
            Self::UnknownName { field, name } => {
                write!(f, "invalid `{field}`: no object is named `{name}`")
            }
            Self::AmbiguousName { field, name } => write!(
                f,
                "invalid `{field}`: several objects are named `{name}`; use its id"
            ),
            Self::Duplicate { entity, field } => {
                write!(f, "{entity} with this `{field}` already exists")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// CRUD contract shared by every entity repository.
pub trait Repository {
    type Record;
    type Draft;

    /// Validates and inserts a draft, returning the stored record.
    fn create(&self, draft: &Self::Draft) -> RepoResult<Self::Record>;
    fn get(&self, id: RecordId) -> RepoResult<Option<Self::Record>>;
    /// Replaces all writable attributes and refreshes `modified`.
    fn update(&self, id: RecordId, draft: &Self::Draft) -> RepoResult<Self::Record>;
    /// Hard-deletes one row; dependent rows follow the schema cascades.
    fn delete(&self, id: RecordId) -> RepoResult<()>;
    /// Lists rows matching every filter clause, ordered by id.
    fn list(&self, filter: &FilterSet) -> RepoResult<Vec<Self::Record>>;
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn parse_flag(row: &Row<'_>, table: &str, column: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {table}.{column}"
        ))),
    }
}

/// Reads `created`, `modified` and `active` from a row of `table`.
pub(crate) fn parse_meta(row: &Row<'_>, table: &str) -> RepoResult<RecordMeta> {
    Ok(RecordMeta {
        created: row.get("created")?,
        modified: row.get("modified")?,
        active: parse_flag(row, table, "active")?,
    })
}

pub(crate) fn row_exists(conn: &Connection, table: &str, id: RecordId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Fails with `MissingReference` unless `table` holds a row with `id`.
pub(crate) fn require_reference(
    conn: &Connection,
    table: &str,
    field: &'static str,
    id: RecordId,
) -> RepoResult<()> {
    if row_exists(conn, table, id)? {
        Ok(())
    } else {
        Err(RepoError::MissingReference { field, id })
    }
}

pub(crate) fn delete_row(
    conn: &Connection,
    table: &str,
    entity: &'static str,
    id: RecordId,
) -> RepoResult<()> {
    let changed = conn.execute(&format!("DELETE FROM {table} WHERE id = ?1;"), [id])?;
    if changed == 0 {
        return Err(RepoError::NotFound { entity, id });
    }
    Ok(())
}

/// Maps SQLite constraint failures that slipped past the pre-checks.
pub(crate) fn map_constraint(
    err: rusqlite::Error,
    entity: &'static str,
    unique_field: &'static str,
) -> RepoError {
    let extended_code = match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Some(failure.extended_code)
        }
        _ => None,
    };

    match extended_code {
        Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) => RepoError::Duplicate {
            entity,
            field: unique_field,
        },
        Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
            RepoError::InvalidData(format!("{entity} references a missing row"))
        }
        _ => RepoError::from(err),
    }
}
