//! Point element repository.

use crate::model::point_element::{PointElement, PointElementDraft};
use crate::model::RecordId;
use crate::repo::{
    bool_to_int, delete_row, map_constraint, parse_meta, require_reference, FilterField,
    FilterSet, RepoError, RepoResult, Repository,
};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const POINT_ELEMENT_SELECT_SQL: &str = "SELECT
    id,
    created,
    modified,
    active,
    point_id,
    element_id
FROM point_elements";

/// Filterable point element attributes.
pub const POINT_ELEMENT_FILTERS: &[FilterField] = &[
    FilterField::boolean("active", "point_elements.active"),
    FilterField::reference("point", "point_elements.point_id"),
    FilterField::reference("element", "point_elements.element_id"),
];

pub struct SqlitePointElementRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePointElementRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn require(&self, id: RecordId) -> RepoResult<PointElement> {
        self.get(id)?.ok_or(RepoError::NotFound {
            entity: "point element",
            id,
        })
    }

    fn check_references(&self, draft: &PointElementDraft) -> RepoResult<()> {
        require_reference(self.conn, "points", "point", draft.point)?;
        require_reference(self.conn, "elements", "element", draft.element)
    }
}

impl Repository for SqlitePointElementRepository<'_> {
    type Record = PointElement;
    type Draft = PointElementDraft;

    fn create(&self, draft: &PointElementDraft) -> RepoResult<PointElement> {
        self.check_references(draft)?;
        let now = Utc::now();

        self.conn
            .execute(
                "INSERT INTO point_elements (created, modified, active, point_id, element_id)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    now.date_naive(),
                    now,
                    bool_to_int(draft.active),
                    draft.point,
                    draft.element,
                ],
            )
            .map_err(|err| map_constraint(err, "point element", "id"))?;

        self.require(self.conn.last_insert_rowid())
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<PointElement>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POINT_ELEMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_point_element_row(row)?));
        }
        Ok(None)
    }

    fn update(&self, id: RecordId, draft: &PointElementDraft) -> RepoResult<PointElement> {
        if self.get(id)?.is_none() {
            return Err(RepoError::NotFound {
                entity: "point element",
                id,
            });
        }
        self.check_references(draft)?;

        self.conn
            .execute(
                "UPDATE point_elements
                 SET
                    modified = ?1,
                    active = ?2,
                    point_id = ?3,
                    element_id = ?4
                 WHERE id = ?5;",
                params![
                    Utc::now(),
                    bool_to_int(draft.active),
                    draft.point,
                    draft.element,
                    id,
                ],
            )
            .map_err(|err| map_constraint(err, "point element", "id"))?;

        self.require(id)
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        delete_row(self.conn, "point_elements", "point element", id)
    }

    fn list(&self, filter: &FilterSet) -> RepoResult<Vec<PointElement>> {
        let mut sql = format!("{POINT_ELEMENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        filter.push_sql(&mut sql, &mut bind_values);
        sql.push_str(" ORDER BY point_elements.id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut point_elements = Vec::new();
        while let Some(row) = rows.next()? {
            point_elements.push(parse_point_element_row(row)?);
        }
        Ok(point_elements)
    }
}

fn parse_point_element_row(row: &Row<'_>) -> RepoResult<PointElement> {
    Ok(PointElement {
        id: row.get("id")?,
        meta: parse_meta(row, "point_elements")?,
        point: row.get("point_id")?,
        element: row.get("element_id")?,
    })
}
