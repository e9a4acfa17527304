//! Point/element association model.
//!
//! # Invariants
//! - Both references must point at existing rows when written.
//! - Deleting the point or the element deletes the association.

use super::base::{default_active, Record, RecordId, RecordMeta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct PointElement {
    pub id: RecordId,
    pub meta: RecordMeta,
    pub point: RecordId,
    pub element: RecordId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointElementDraft {
    pub point: RecordId,
    pub element: RecordId,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl PointElementDraft {
    pub fn new(point: RecordId, element: RecordId) -> Self {
        Self {
            point,
            element,
            active: true,
        }
    }
}

impl Record for PointElement {
    type Draft = PointElementDraft;
    const ENTITY: &'static str = "point element";

    fn id(&self) -> RecordId {
        self.id
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn to_draft(&self) -> PointElementDraft {
        PointElementDraft {
            point: self.point,
            element: self.element,
            active: self.meta.active,
        }
    }
}
