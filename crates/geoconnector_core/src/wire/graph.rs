use crate::model::RecordId;
use crate::repo::RepoResult;
use rusqlite::{Connection, OptionalExtension};

/// Read-only lookups used to resolve derived wire fields.
pub struct Graph<'conn> {
    conn: &'conn Connection,
}

impl<'conn> Graph<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn location_name(&self, id: RecordId) -> RepoResult<Option<String>> {
        self.single_text("SELECT location_name FROM locations WHERE id = ?1;", id)
    }

    /// `None` when the point is gone or has no name.
    pub fn point_name(&self, id: RecordId) -> RepoResult<Option<String>> {
        let name: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT point_name FROM points WHERE id = ?1;",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name.flatten())
    }

    pub fn element_name(&self, id: RecordId) -> RepoResult<Option<String>> {
        self.single_text("SELECT element_name FROM elements WHERE id = ?1;", id)
    }

    /// Names of the given resource links, in input order; missing ids are skipped.
    pub fn resource_link_names(&self, ids: &[RecordId]) -> RepoResult<Vec<String>> {
        let mut names = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(name) = self.single_text(
                "SELECT resource_link_name FROM resource_links WHERE id = ?1;",
                *id,
            )? {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn single_text(&self, sql: &str, id: RecordId) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(sql, [id], |row| row.get(0))
            .optional()?;
        Ok(value)
    }
}
