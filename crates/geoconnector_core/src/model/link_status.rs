//! Point/resource-link status model.
//!
//! # Responsibility
//! - Track the completion state of a set of resource links over a set of
//!   points.
//!
//! # Invariants
//! - `status` is one of `Completed` or `Incomplete` (default).
//! - Drafts link at least one point and one resource link.
//! - Link sets are stored without duplicates, ordered by id.
//! - Resource links may be written by id or by name; names resolve to ids
//!   before anything is stored.

use super::base::{default_active, Record, RecordId, RecordMeta};
use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkStatus {
    Completed,
    #[default]
    Incomplete,
}

impl LinkStatus {
    /// Every accepted value, in declaration order.
    pub const CHOICES: &'static [&'static str] = &["Completed", "Incomplete"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Incomplete => "Incomplete",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Completed" => Some(Self::Completed),
            "Incomplete" => Some(Self::Incomplete),
            _ => None,
        }
    }
}

/// A resource link as accepted on write: its id, or its unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceRef {
    Id(RecordId),
    Name(String),
}

impl From<RecordId> for ResourceRef {
    fn from(value: RecordId) -> Self {
        Self::Id(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointResourceLinkStatus {
    pub id: RecordId,
    pub meta: RecordMeta,
    pub status: LinkStatus,
    pub linked_points: Vec<RecordId>,
    pub linked_resources: Vec<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointResourceLinkStatusDraft {
    #[serde(default)]
    pub status: LinkStatus,
    pub linked_points: Vec<RecordId>,
    pub linked_resources: Vec<ResourceRef>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl PointResourceLinkStatusDraft {
    pub fn new(linked_points: Vec<RecordId>, linked_resources: Vec<RecordId>) -> Self {
        Self {
            status: LinkStatus::default(),
            linked_points,
            linked_resources: linked_resources.into_iter().map(ResourceRef::Id).collect(),
            active: true,
        }
    }

    pub fn with_status(mut self, status: LinkStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.linked_points.is_empty() {
            return Err(ValidationError::EmptyList {
                field: "linked_points",
            });
        }
        if self.linked_resources.is_empty() {
            return Err(ValidationError::EmptyList {
                field: "linked_resources",
            });
        }
        Ok(())
    }
}

impl Record for PointResourceLinkStatus {
    type Draft = PointResourceLinkStatusDraft;
    const ENTITY: &'static str = "point resource link status";

    fn id(&self) -> RecordId {
        self.id
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn to_draft(&self) -> PointResourceLinkStatusDraft {
        PointResourceLinkStatusDraft {
            status: self.status,
            linked_points: self.linked_points.clone(),
            linked_resources: self
                .linked_resources
                .iter()
                .copied()
                .map(ResourceRef::Id)
                .collect(),
            active: self.meta.active,
        }
    }
}
