//! Resource link model.

use super::base::{default_active, Record, RecordId, RecordMeta};
use super::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceLink {
    pub id: RecordId,
    pub meta: RecordMeta,
    pub resource_link_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLinkDraft {
    pub resource_link_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl ResourceLinkDraft {
    pub fn new(resource_link_name: impl Into<String>) -> Self {
        Self {
            resource_link_name: resource_link_name.into(),
            active: true,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("resource_link_name", &self.resource_link_name)
    }
}

impl Record for ResourceLink {
    type Draft = ResourceLinkDraft;
    const ENTITY: &'static str = "resource link";

    fn id(&self) -> RecordId {
        self.id
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn to_draft(&self) -> ResourceLinkDraft {
        ResourceLinkDraft {
            resource_link_name: self.resource_link_name.clone(),
            active: self.meta.active,
        }
    }
}
