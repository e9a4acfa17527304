//! Serialization layer: stored entities to flat JSON wire records.
//!
//! # Responsibility
//! - Project each entity into the record emitted by the HTTP surface.
//! - Resolve derived read-only fields by following one relationship hop.
//!
//! # Invariants
//! - Projection never writes to the store.
//! - A missing relationship target yields `null`, never an error.

mod graph;
mod records;

pub use graph::Graph;
pub use records::{
    Coordinates, ElementWire, LinkStatusListItem, LinkStatusWire, LocationWire, PointElementWire,
    PointWire, ResourceLinkWire,
};

use crate::repo::RepoResult;
use serde::Serialize;

/// Projection of a stored entity into its wire record.
pub trait ToWire {
    type Wire: Serialize + Send;

    fn to_wire(&self, graph: &Graph<'_>) -> RepoResult<Self::Wire>;
}
