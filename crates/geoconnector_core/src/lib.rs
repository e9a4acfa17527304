//! Core domain logic for the geoconnector API.
//! This crate is the single source of truth for entity invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod wire;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::{Record, RecordId, RecordMeta, ValidationError};
pub use repo::{FilterError, FilterField, FilterSet, RepoError, RepoResult, Repository};
pub use service::auth_service::{AuthError, AuthResult, AuthService};
pub use service::link_status_service::LinkStatusService;
pub use wire::{Graph, ToWire};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
