//! Point repository.
//!
//! # Invariants
//! - The owning location must exist before a point is written.
//! - `point_name` (when set) and `geolocation` are unique across points;
//!   collisions surface as `RepoError::Duplicate`.

use crate::model::point::{GeoPoint, Point, PointDraft};
use crate::model::RecordId;
use crate::repo::{
    bool_to_int, delete_row, map_constraint, parse_meta, require_reference, FilterField,
    FilterSet, RepoError, RepoResult, Repository,
};
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const POINT_SELECT_SQL: &str = "SELECT
    id,
    created,
    modified,
    active,
    location_id,
    point_type,
    point_name,
    longitude,
    latitude
FROM points";

/// Filterable point attributes.
pub const POINT_FILTERS: &[FilterField] = &[
    FilterField::boolean("active", "points.active"),
    FilterField::reference("location", "points.location_id"),
    FilterField::text("point_type", "points.point_type"),
    FilterField::text("point_name", "points.point_name"),
];

pub struct SqlitePointRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePointRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Looks up the point stored at exactly `geolocation`.
    pub fn find_by_geolocation(&self, geolocation: GeoPoint) -> RepoResult<Option<Point>> {
        let mut stmt = self.conn.prepare(&format!(
            "{POINT_SELECT_SQL} WHERE longitude = ?1 AND latitude = ?2;"
        ))?;
        let mut rows = stmt.query(params![geolocation.longitude, geolocation.latitude])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_point_row(row)?));
        }
        Ok(None)
    }

    fn require(&self, id: RecordId) -> RepoResult<Point> {
        self.get(id)?
            .ok_or(RepoError::NotFound { entity: "point", id })
    }

    fn check_write(&self, draft: &PointDraft, current: Option<RecordId>) -> RepoResult<()> {
        draft.validate()?;
        require_reference(self.conn, "locations", "location", draft.location)?;

        if let Some(name) = draft.stored_point_name() {
            let taken: i64 = self.conn.query_row(
                "SELECT EXISTS(
                    SELECT 1 FROM points
                    WHERE point_name = ?1 AND (?2 IS NULL OR id != ?2)
                );",
                params![name, current],
                |row| row.get(0),
            )?;
            if taken == 1 {
                return Err(RepoError::Duplicate {
                    entity: "point",
                    field: "point_name",
                });
            }
        }

        let taken: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM points
                WHERE longitude = ?1 AND latitude = ?2 AND (?3 IS NULL OR id != ?3)
            );",
            params![
                draft.geolocation.longitude,
                draft.geolocation.latitude,
                current
            ],
            |row| row.get(0),
        )?;
        if taken == 1 {
            return Err(RepoError::Duplicate {
                entity: "point",
                field: "geolocation",
            });
        }

        Ok(())
    }
}

impl Repository for SqlitePointRepository<'_> {
    type Record = Point;
    type Draft = PointDraft;

    fn create(&self, draft: &PointDraft) -> RepoResult<Point> {
        self.check_write(draft, None)?;
        let now = Utc::now();

        self.conn
            .execute(
                "INSERT INTO points (
                    created,
                    modified,
                    active,
                    location_id,
                    point_type,
                    point_name,
                    longitude,
                    latitude
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    now.date_naive(),
                    now,
                    bool_to_int(draft.active),
                    draft.location,
                    draft.point_type.as_str(),
                    draft.stored_point_name(),
                    draft.geolocation.longitude,
                    draft.geolocation.latitude,
                ],
            )
            .map_err(|err| map_constraint(err, "point", "geolocation"))?;

        self.require(self.conn.last_insert_rowid())
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<Point>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POINT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_point_row(row)?));
        }
        Ok(None)
    }

    fn update(&self, id: RecordId, draft: &PointDraft) -> RepoResult<Point> {
        if self.get(id)?.is_none() {
            return Err(RepoError::NotFound { entity: "point", id });
        }
        self.check_write(draft, Some(id))?;

        self.conn
            .execute(
                "UPDATE points
                 SET
                    modified = ?1,
                    active = ?2,
                    location_id = ?3,
                    point_type = ?4,
                    point_name = ?5,
                    longitude = ?6,
                    latitude = ?7
                 WHERE id = ?8;",
                params![
                    Utc::now(),
                    bool_to_int(draft.active),
                    draft.location,
                    draft.point_type.as_str(),
                    draft.stored_point_name(),
                    draft.geolocation.longitude,
                    draft.geolocation.latitude,
                    id,
                ],
            )
            .map_err(|err| map_constraint(err, "point", "geolocation"))?;

        self.require(id)
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        delete_row(self.conn, "points", "point", id)
    }

    fn list(&self, filter: &FilterSet) -> RepoResult<Vec<Point>> {
        let mut sql = format!("{POINT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        filter.push_sql(&mut sql, &mut bind_values);
        sql.push_str(" ORDER BY points.id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut points = Vec::new();
        while let Some(row) = rows.next()? {
            points.push(parse_point_row(row)?);
        }
        Ok(points)
    }
}

fn parse_point_row(row: &Row<'_>) -> RepoResult<Point> {
    Ok(Point {
        id: row.get("id")?,
        meta: parse_meta(row, "points")?,
        location: row.get("location_id")?,
        point_type: row.get("point_type")?,
        point_name: row.get("point_name")?,
        geolocation: GeoPoint {
            longitude: row.get("longitude")?,
            latitude: row.get("latitude")?,
        },
    })
}
