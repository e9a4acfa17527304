//! Binding between an entity and its HTTP collection.

use geoconnector_core::model::element::{Element, ElementDraft};
use geoconnector_core::model::link_status::{PointResourceLinkStatus, PointResourceLinkStatusDraft};
use geoconnector_core::model::location::{Location, LocationDraft};
use geoconnector_core::model::point::{Point, PointDraft};
use geoconnector_core::model::point_element::{PointElement, PointElementDraft};
use geoconnector_core::model::resource_link::{ResourceLink, ResourceLinkDraft};
use geoconnector_core::repo::element_repo::{SqliteElementRepository, ELEMENT_FILTERS};
use geoconnector_core::repo::link_status_repo::{SqliteLinkStatusRepository, LINK_STATUS_FILTERS};
use geoconnector_core::repo::location_repo::{SqliteLocationRepository, LOCATION_FILTERS};
use geoconnector_core::repo::point_element_repo::{
    SqlitePointElementRepository, POINT_ELEMENT_FILTERS,
};
use geoconnector_core::repo::point_repo::{SqlitePointRepository, POINT_FILTERS};
use geoconnector_core::repo::resource_link_repo::{
    SqliteResourceLinkRepository, RESOURCE_LINK_FILTERS,
};
use geoconnector_core::{FilterField, Record, Repository, ToWire};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub type RepositoryBox<'conn, R> = Box<
    dyn Repository<Record = <R as Resource>::Record, Draft = <R as Resource>::Draft> + 'conn,
>;

/// Wire record emitted for a resource.
pub type WireOf<R> = <<R as Resource>::Record as ToWire>::Wire;

/// One entity collection exposed under the API prefix.
pub trait Resource: Send + Sync + 'static {
    /// Collection segment, e.g. `points`.
    const PATH: &'static str;

    type Record: Record<Draft = Self::Draft> + ToWire + Send;
    type Draft: DeserializeOwned + Serialize + Send;

    /// Query parameters honoured by the list operation.
    fn filters() -> &'static [FilterField];

    fn repository(conn: &Connection) -> RepositoryBox<'_, Self>;
}

pub struct LocationResource;
pub struct ElementResource;
pub struct PointResource;
pub struct PointElementResource;
pub struct ResourceLinkResource;
pub struct LinkStatusResource;

impl Resource for LocationResource {
    const PATH: &'static str = "locations";
    type Record = Location;
    type Draft = LocationDraft;

    fn filters() -> &'static [FilterField] {
        LOCATION_FILTERS
    }

    fn repository(conn: &Connection) -> RepositoryBox<'_, Self> {
        Box::new(SqliteLocationRepository::new(conn))
    }
}

impl Resource for ElementResource {
    const PATH: &'static str = "elements";
    type Record = Element;
    type Draft = ElementDraft;

    fn filters() -> &'static [FilterField] {
        ELEMENT_FILTERS
    }

    fn repository(conn: &Connection) -> RepositoryBox<'_, Self> {
        Box::new(SqliteElementRepository::new(conn))
    }
}

impl Resource for PointResource {
    const PATH: &'static str = "points";
    type Record = Point;
    type Draft = PointDraft;

    fn filters() -> &'static [FilterField] {
        POINT_FILTERS
    }

    fn repository(conn: &Connection) -> RepositoryBox<'_, Self> {
        Box::new(SqlitePointRepository::new(conn))
    }
}

impl Resource for PointElementResource {
    const PATH: &'static str = "pointelements";
    type Record = PointElement;
    type Draft = PointElementDraft;

    fn filters() -> &'static [FilterField] {
        POINT_ELEMENT_FILTERS
    }

    fn repository(conn: &Connection) -> RepositoryBox<'_, Self> {
        Box::new(SqlitePointElementRepository::new(conn))
    }
}

impl Resource for ResourceLinkResource {
    const PATH: &'static str = "resourcelinks";
    type Record = ResourceLink;
    type Draft = ResourceLinkDraft;

    fn filters() -> &'static [FilterField] {
        RESOURCE_LINK_FILTERS
    }

    fn repository(conn: &Connection) -> RepositoryBox<'_, Self> {
        Box::new(SqliteResourceLinkRepository::new(conn))
    }
}

impl Resource for LinkStatusResource {
    const PATH: &'static str = "pointresourcelinkstatuses";
    type Record = PointResourceLinkStatus;
    type Draft = PointResourceLinkStatusDraft;

    fn filters() -> &'static [FilterField] {
        LINK_STATUS_FILTERS
    }

    fn repository(conn: &Connection) -> RepositoryBox<'_, Self> {
        Box::new(SqliteLinkStatusRepository::new(conn))
    }
}
