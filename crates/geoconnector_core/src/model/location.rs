//! Location model: a named place grouping points.

use super::base::{default_active, Record, RecordId, RecordMeta};
use super::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: RecordId,
    pub meta: RecordMeta,
    /// Free-form location category, exposed as `type`.
    pub kind: String,
    pub location_name: String,
}

/// Writable attributes of a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDraft {
    #[serde(rename = "type")]
    pub kind: String,
    pub location_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl LocationDraft {
    pub fn new(kind: impl Into<String>, location_name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            location_name: location_name.into(),
            active: true,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("type", &self.kind)?;
        require_text("location_name", &self.location_name)
    }
}

impl Record for Location {
    type Draft = LocationDraft;
    const ENTITY: &'static str = "location";

    fn id(&self) -> RecordId {
        self.id
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn to_draft(&self) -> LocationDraft {
        LocationDraft {
            kind: self.kind.clone(),
            location_name: self.location_name.clone(),
            active: self.meta.active,
        }
    }
}
