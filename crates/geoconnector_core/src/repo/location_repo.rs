//! Location repository.

use crate::model::location::{Location, LocationDraft};
use crate::model::RecordId;
use crate::repo::{
    bool_to_int, delete_row, parse_meta, FilterField, FilterSet, RepoError, RepoResult,
    Repository,
};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const LOCATION_SELECT_SQL: &str = "SELECT
    id,
    created,
    modified,
    active,
    type,
    location_name
FROM locations";

/// Filterable location attributes.
pub const LOCATION_FILTERS: &[FilterField] = &[
    FilterField::boolean("active", "locations.active"),
    FilterField::text("type", "locations.type"),
    FilterField::text("location_name", "locations.location_name"),
];

pub struct SqliteLocationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLocationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn require(&self, id: RecordId) -> RepoResult<Location> {
        self.get(id)?.ok_or(RepoError::NotFound {
            entity: "location",
            id,
        })
    }
}

impl Repository for SqliteLocationRepository<'_> {
    type Record = Location;
    type Draft = LocationDraft;

    fn create(&self, draft: &LocationDraft) -> RepoResult<Location> {
        draft.validate()?;
        let now = Utc::now();

        self.conn.execute(
            "INSERT INTO locations (created, modified, active, type, location_name)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                now.date_naive(),
                now,
                bool_to_int(draft.active),
                draft.kind.as_str(),
                draft.location_name.as_str(),
            ],
        )?;

        self.require(self.conn.last_insert_rowid())
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<Location>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LOCATION_SELECT_SQL} WHERE locations.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_location_row(row)?));
        }
        Ok(None)
    }

    fn update(&self, id: RecordId, draft: &LocationDraft) -> RepoResult<Location> {
        draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE locations
             SET
                modified = ?1,
                active = ?2,
                type = ?3,
                location_name = ?4
             WHERE id = ?5;",
            params![
                Utc::now(),
                bool_to_int(draft.active),
                draft.kind.as_str(),
                draft.location_name.as_str(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "location",
                id,
            });
        }

        self.require(id)
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        delete_row(self.conn, "locations", "location", id)
    }

    fn list(&self, filter: &FilterSet) -> RepoResult<Vec<Location>> {
        let mut sql = format!("{LOCATION_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        filter.push_sql(&mut sql, &mut bind_values);
        sql.push_str(" ORDER BY locations.id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut locations = Vec::new();
        while let Some(row) = rows.next()? {
            locations.push(parse_location_row(row)?);
        }
        Ok(locations)
    }
}

fn parse_location_row(row: &Row<'_>) -> RepoResult<Location> {
    Ok(Location {
        id: row.get("id")?,
        meta: parse_meta(row, "locations")?,
        kind: row.get("type")?,
        location_name: row.get("location_name")?,
    })
}
