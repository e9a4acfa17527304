//! Attributes and traits shared by every stored entity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned row identifier.
pub type RecordId = i64;

/// Bookkeeping attributes carried by every entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Day of the first write. Never changes afterwards.
    pub created: NaiveDate,
    /// Refreshed on every write.
    pub modified: DateTime<Utc>,
    /// Soft-disable flag; `false` hides nothing by itself, callers filter on it.
    pub active: bool,
}

impl RecordMeta {
    /// Metadata for a record being written for the first time.
    pub fn new(active: bool) -> Self {
        let now = Utc::now();
        Self {
            created: now.date_naive(),
            modified: now,
            active,
        }
    }
}

/// Common view over stored entities, used by generic CRUD callers.
pub trait Record {
    /// Write model accepted for this entity.
    type Draft;
    /// Singular entity name used in error messages and logs.
    const ENTITY: &'static str;

    fn id(&self) -> RecordId;
    fn meta(&self) -> &RecordMeta;
    /// Returns the writable attributes of this record.
    fn to_draft(&self) -> Self::Draft;
}

pub(crate) fn default_active() -> bool {
    true
}
