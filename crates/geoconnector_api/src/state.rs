//! Shared request state.
//!
//! # Invariants
//! - One SQLite connection serves every request, serialized by a mutex.
//! - The lock is only taken inside synchronous closures, never across an
//!   await point.

use crate::error::ApiError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    conn: Mutex<Connection>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn shared(conn: Connection) -> SharedState {
        Arc::new(Self::new(conn))
    }

    /// Runs `work` with exclusive access to the connection.
    pub fn with_conn<T>(
        &self,
        work: impl FnOnce(&Connection) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let guard = self
            .conn
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".to_string()))?;
        work(&guard)
    }
}
