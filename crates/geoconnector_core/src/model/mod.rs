//! Domain model for the geospatial entities and API accounts.
//!
//! # Responsibility
//! - Define the stored shape of every entity (`Location`, `Point`, ...).
//! - Define the write models (`*Draft`) accepted on create and update.
//!
//! # Invariants
//! - Every entity carries a store-assigned `RecordId` and `RecordMeta`.
//! - Drafts are validated before any write reaches the store.

pub mod account;
pub mod base;
pub mod element;
pub mod link_status;
pub mod location;
pub mod point;
pub mod point_element;
pub mod resource_link;
pub mod validation;

pub use base::{Record, RecordId, RecordMeta};
pub use validation::ValidationError;
