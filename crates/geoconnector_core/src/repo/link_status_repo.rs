//! Point resource link status repository.
//!
//! # Responsibility
//! - Persist status rows together with their point and resource-link sets.
//!
//! # Invariants
//! - A status row and its link sets are written in one transaction.
//! - Link sets are replaced wholesale on update.
//! - Every linked id must reference an existing row at write time.
//! - A resource link given by name must match exactly one row.

use crate::model::link_status::{
    LinkStatus, PointResourceLinkStatus, PointResourceLinkStatusDraft, ResourceRef,
};
use crate::model::RecordId;
use crate::repo::{
    bool_to_int, delete_row, parse_meta, require_reference, row_exists, FilterField, FilterSet,
    RepoError, RepoResult, Repository,
};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;

const LINK_STATUS_SELECT_SQL: &str = "SELECT
    id,
    created,
    modified,
    active,
    status
FROM point_resource_link_statuses";

/// Filterable status attributes.
pub const LINK_STATUS_FILTERS: &[FilterField] = &[
    FilterField::boolean("active", "point_resource_link_statuses.active"),
    FilterField::many_to_many(
        "linked_points",
        "point_resource_link_statuses.id",
        "link_status_points",
        "status_id",
        "point_id",
    ),
    FilterField::many_to_many(
        "linked_resources",
        "point_resource_link_statuses.id",
        "link_status_resources",
        "status_id",
        "resource_link_id",
    ),
    FilterField::choice(
        "status",
        "point_resource_link_statuses.status",
        LinkStatus::CHOICES,
    ),
];

/// Resolved, deduplicated link sets of one status row.
struct LinkSets {
    points: BTreeSet<RecordId>,
    resources: BTreeSet<RecordId>,
}

pub struct SqliteLinkStatusRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLinkStatusRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn require(&self, id: RecordId) -> RepoResult<PointResourceLinkStatus> {
        self.get(id)?.ok_or(RepoError::NotFound {
            entity: "point resource link status",
            id,
        })
    }

    /// Validates the draft and resolves it to the id sets to store.
    fn check_write(&self, draft: &PointResourceLinkStatusDraft) -> RepoResult<LinkSets> {
        draft.validate()?;
        for point_id in &draft.linked_points {
            require_reference(self.conn, "points", "linked_points", *point_id)?;
        }

        let mut resources = BTreeSet::new();
        for resource in &draft.linked_resources {
            let resource_id = match resource {
                ResourceRef::Id(id) => {
                    require_reference(self.conn, "resource_links", "linked_resources", *id)?;
                    *id
                }
                ResourceRef::Name(name) => resource_link_by_name(self.conn, name)?,
            };
            resources.insert(resource_id);
        }

        Ok(LinkSets {
            points: draft.linked_points.iter().copied().collect(),
            resources,
        })
    }

    fn load_links(&self, row: &Row<'_>) -> RepoResult<PointResourceLinkStatus> {
        let id: RecordId = row.get("id")?;
        let status_text: String = row.get("status")?;
        let status = LinkStatus::parse(&status_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid status `{status_text}` in point_resource_link_statuses.status"
            ))
        })?;

        Ok(PointResourceLinkStatus {
            id,
            meta: parse_meta(row, "point_resource_link_statuses")?,
            status,
            linked_points: linked_ids(self.conn, "link_status_points", "point_id", id)?,
            linked_resources: linked_ids(
                self.conn,
                "link_status_resources",
                "resource_link_id",
                id,
            )?,
        })
    }
}

impl Repository for SqliteLinkStatusRepository<'_> {
    type Record = PointResourceLinkStatus;
    type Draft = PointResourceLinkStatusDraft;

    fn create(&self, draft: &PointResourceLinkStatusDraft) -> RepoResult<PointResourceLinkStatus> {
        let links = self.check_write(draft)?;
        let now = Utc::now();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO point_resource_link_statuses (created, modified, active, status)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                now.date_naive(),
                now,
                bool_to_int(draft.active),
                draft.status.as_str(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        replace_links(&tx, id, &links)?;
        tx.commit()?;

        self.require(id)
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<PointResourceLinkStatus>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LINK_STATUS_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(self.load_links(row)?));
        }
        Ok(None)
    }

    fn update(
        &self,
        id: RecordId,
        draft: &PointResourceLinkStatusDraft,
    ) -> RepoResult<PointResourceLinkStatus> {
        if !row_exists(self.conn, "point_resource_link_statuses", id)? {
            return Err(RepoError::NotFound {
                entity: "point resource link status",
                id,
            });
        }
        let links = self.check_write(draft)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE point_resource_link_statuses
             SET
                modified = ?1,
                active = ?2,
                status = ?3
             WHERE id = ?4;",
            params![
                Utc::now(),
                bool_to_int(draft.active),
                draft.status.as_str(),
                id
            ],
        )?;
        replace_links(&tx, id, &links)?;
        tx.commit()?;

        self.require(id)
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        delete_row(
            self.conn,
            "point_resource_link_statuses",
            "point resource link status",
            id,
        )
    }

    fn list(&self, filter: &FilterSet) -> RepoResult<Vec<PointResourceLinkStatus>> {
        let mut sql = format!("{LINK_STATUS_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        filter.push_sql(&mut sql, &mut bind_values);
        sql.push_str(" ORDER BY point_resource_link_statuses.id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut statuses = Vec::new();
        while let Some(row) = rows.next()? {
            statuses.push(self.load_links(row)?);
        }
        Ok(statuses)
    }
}

fn replace_links(conn: &Connection, status_id: RecordId, links: &LinkSets) -> RepoResult<()> {
    conn.execute(
        "DELETE FROM link_status_points WHERE status_id = ?1;",
        [status_id],
    )?;
    conn.execute(
        "DELETE FROM link_status_resources WHERE status_id = ?1;",
        [status_id],
    )?;

    for point_id in &links.points {
        conn.execute(
            "INSERT INTO link_status_points (status_id, point_id) VALUES (?1, ?2);",
            params![status_id, point_id],
        )?;
    }

    for resource_id in &links.resources {
        conn.execute(
            "INSERT INTO link_status_resources (status_id, resource_link_id) VALUES (?1, ?2);",
            params![status_id, resource_id],
        )?;
    }

    Ok(())
}

fn resource_link_by_name(conn: &Connection, name: &str) -> RepoResult<RecordId> {
    let mut stmt = conn.prepare(
        "SELECT id FROM resource_links
         WHERE resource_link_name = ?1
         ORDER BY id ASC
         LIMIT 2;",
    )?;
    let mut rows = stmt.query([name])?;
    let mut ids: Vec<RecordId> = Vec::new();
    while let Some(row) = rows.next()? {
        ids.push(row.get(0)?);
    }

    match ids.as_slice() {
        [id] => Ok(*id),
        [] => Err(RepoError::UnknownName {
            field: "linked_resources",
            name: name.to_string(),
        }),
        _ => Err(RepoError::AmbiguousName {
            field: "linked_resources",
            name: name.to_string(),
        }),
    }
}

fn linked_ids(
    conn: &Connection,
    link_table: &str,
    target_column: &str,
    status_id: RecordId,
) -> RepoResult<Vec<RecordId>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {target_column} FROM {link_table}
         WHERE status_id = ?1
         ORDER BY {target_column} ASC;"
    ))?;
    let mut rows = stmt.query([status_id])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        ids.push(row.get(0)?);
    }
    Ok(ids)
}
