//! Resource link repository.

use crate::model::resource_link::{ResourceLink, ResourceLinkDraft};
use crate::model::RecordId;
use crate::repo::{
    bool_to_int, delete_row, parse_meta, FilterField, FilterSet, RepoError, RepoResult,
    Repository,
};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const RESOURCE_LINK_SELECT_SQL: &str = "SELECT
    id,
    created,
    modified,
    active,
    resource_link_name
FROM resource_links";

/// Filterable resource link attributes.
pub const RESOURCE_LINK_FILTERS: &[FilterField] = &[
    FilterField::boolean("active", "resource_links.active"),
    FilterField::text("resource_link_name", "resource_links.resource_link_name"),
];

pub struct SqliteResourceLinkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteResourceLinkRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn require(&self, id: RecordId) -> RepoResult<ResourceLink> {
        self.get(id)?.ok_or(RepoError::NotFound {
            entity: "resource link",
            id,
        })
    }
}

impl Repository for SqliteResourceLinkRepository<'_> {
    type Record = ResourceLink;
    type Draft = ResourceLinkDraft;

    fn create(&self, draft: &ResourceLinkDraft) -> RepoResult<ResourceLink> {
        draft.validate()?;
        let now = Utc::now();

        self.conn.execute(
            "INSERT INTO resource_links (created, modified, active, resource_link_name)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                now.date_naive(),
                now,
                bool_to_int(draft.active),
                draft.resource_link_name.as_str(),
            ],
        )?;

        self.require(self.conn.last_insert_rowid())
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<ResourceLink>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RESOURCE_LINK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_resource_link_row(row)?));
        }
        Ok(None)
    }

    fn update(&self, id: RecordId, draft: &ResourceLinkDraft) -> RepoResult<ResourceLink> {
        draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE resource_links
             SET
                modified = ?1,
                active = ?2,
                resource_link_name = ?3
             WHERE id = ?4;",
            params![
                Utc::now(),
                bool_to_int(draft.active),
                draft.resource_link_name.as_str(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "resource link",
                id,
            });
        }

        self.require(id)
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        delete_row(self.conn, "resource_links", "resource link", id)
    }

    fn list(&self, filter: &FilterSet) -> RepoResult<Vec<ResourceLink>> {
        let mut sql = format!("{RESOURCE_LINK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        filter.push_sql(&mut sql, &mut bind_values);
        sql.push_str(" ORDER BY resource_links.id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            links.push(parse_resource_link_row(row)?);
        }
        Ok(links)
    }
}

fn parse_resource_link_row(row: &Row<'_>) -> RepoResult<ResourceLink> {
    Ok(ResourceLink {
        id: row.get("id")?,
        meta: parse_meta(row, "resource_links")?,
        resource_link_name: row.get("resource_link_name")?,
    })
}
