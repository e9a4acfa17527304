//! Element repository.

use crate::model::element::{Element, ElementDraft};
use crate::model::RecordId;
use crate::repo::{
    bool_to_int, delete_row, parse_meta, FilterField, FilterSet, RepoError, RepoResult,
    Repository,
};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ELEMENT_SELECT_SQL: &str = "SELECT
    id,
    created,
    modified,
    active,
    element_name
FROM elements";

/// Filterable element attributes.
pub const ELEMENT_FILTERS: &[FilterField] = &[
    FilterField::boolean("active", "elements.active"),
    FilterField::text("element_name", "elements.element_name"),
];

pub struct SqliteElementRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteElementRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn require(&self, id: RecordId) -> RepoResult<Element> {
        self.get(id)?.ok_or(RepoError::NotFound {
            entity: "element",
            id,
        })
    }
}

impl Repository for SqliteElementRepository<'_> {
    type Record = Element;
    type Draft = ElementDraft;

    fn create(&self, draft: &ElementDraft) -> RepoResult<Element> {
        draft.validate()?;
        let now = Utc::now();

        self.conn.execute(
            "INSERT INTO elements (created, modified, active, element_name)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                now.date_naive(),
                now,
                bool_to_int(draft.active),
                draft.element_name.as_str(),
            ],
        )?;

        self.require(self.conn.last_insert_rowid())
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<Element>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ELEMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_element_row(row)?));
        }
        Ok(None)
    }

    fn update(&self, id: RecordId, draft: &ElementDraft) -> RepoResult<Element> {
        draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE elements
             SET
                modified = ?1,
                active = ?2,
                element_name = ?3
             WHERE id = ?4;",
            params![
                Utc::now(),
                bool_to_int(draft.active),
                draft.element_name.as_str(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "element",
                id,
            });
        }

        self.require(id)
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        delete_row(self.conn, "elements", "element", id)
    }

    fn list(&self, filter: &FilterSet) -> RepoResult<Vec<Element>> {
        let mut sql = format!("{ELEMENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        filter.push_sql(&mut sql, &mut bind_values);
        sql.push_str(" ORDER BY elements.id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut elements = Vec::new();
        while let Some(row) = rows.next()? {
            elements.push(parse_element_row(row)?);
        }
        Ok(elements)
    }
}

fn parse_element_row(row: &Row<'_>) -> RepoResult<Element> {
    Ok(Element {
        id: row.get("id")?,
        meta: parse_meta(row, "elements")?,
        element_name: row.get("element_name")?,
    })
}
