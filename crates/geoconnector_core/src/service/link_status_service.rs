//! Status list projection.
//!
//! # Responsibility
//! - Replace the linked point ids of serialized status records with the
//!   coordinates of those points.
//!
//! # Invariants
//! - Status records are never dropped, reordered or otherwise altered.
//! - A linked point that no longer exists is omitted from the coordinate list.

use crate::model::point::Point;
use crate::repo::{RepoResult, Repository};
use crate::wire::{Coordinates, LinkStatusListItem, LinkStatusWire};
use log::debug;

/// Resolves status records into their list representation.
pub struct LinkStatusService<R: Repository<Record = Point>> {
    points: R,
}

impl<R: Repository<Record = Point>> LinkStatusService<R> {
    pub fn new(points: R) -> Self {
        Self { points }
    }

    /// Re-fetches every linked point and emits its `{latitude, longitude}`.
    ///
    /// # Errors
    /// - Storage failures while fetching points. Missing points are not errors.
    pub fn attach_coordinates(
        &self,
        statuses: Vec<LinkStatusWire>,
    ) -> RepoResult<Vec<LinkStatusListItem>> {
        let mut items = Vec::with_capacity(statuses.len());
        for status in statuses {
            let mut coordinates = Vec::with_capacity(status.linked_points.len());
            for point_id in &status.linked_points {
                match self.points.get(*point_id)? {
                    Some(point) => coordinates.push(Coordinates::from(point.geolocation)),
                    None => debug!(
                        "event=status_point_missing module=service status=skipped status_id={} point_id={}",
                        status.id, point_id
                    ),
                }
            }

            items.push(LinkStatusListItem {
                id: status.id,
                meta: status.meta,
                status: status.status,
                linked_points: coordinates,
                linked_resources: status.linked_resources,
            });
        }
        Ok(items)
    }
}
