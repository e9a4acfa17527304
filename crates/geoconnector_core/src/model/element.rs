//! Element model: something that can be attached to points.

use super::base::{default_active, Record, RecordId, RecordMeta};
use super::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: RecordId,
    pub meta: RecordMeta,
    pub element_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDraft {
    pub element_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl ElementDraft {
    pub fn new(element_name: impl Into<String>) -> Self {
        Self {
            element_name: element_name.into(),
            active: true,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("element_name", &self.element_name)
    }
}

impl Record for Element {
    type Draft = ElementDraft;
    const ENTITY: &'static str = "element";

    fn id(&self) -> RecordId {
        self.id
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn to_draft(&self) -> ElementDraft {
        ElementDraft {
            element_name: self.element_name.clone(),
            active: self.meta.active,
        }
    }
}
