use super::{Graph, ToWire};
use crate::model::element::Element;
use crate::model::link_status::{LinkStatus, PointResourceLinkStatus};
use crate::model::location::Location;
use crate::model::point::{GeoPoint, Point};
use crate::model::point_element::PointElement;
use crate::model::resource_link::ResourceLink;
use crate::model::{RecordId, RecordMeta};
use crate::repo::RepoResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationWire {
    pub id: RecordId,
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(rename = "type")]
    pub kind: String,
    pub location_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementWire {
    pub id: RecordId,
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub element_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLinkWire {
    pub id: RecordId,
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub resource_link_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointWire {
    pub id: RecordId,
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub location: RecordId,
    pub point_type: String,
    pub point_name: Option<String>,
    pub geolocation: GeoPoint,
    /// Derived from `location`.
    pub location_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointElementWire {
    pub id: RecordId,
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub point: RecordId,
    pub element: RecordId,
    pub point_name: Option<String>,
    pub element_name: Option<String>,
}

/// Status record as emitted by retrieve and write responses.
///
/// `linked_resources` carries resource link names, not ids. The write model
/// accepts those names back, so a fetched record can be written unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkStatusWire {
    pub id: RecordId,
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub status: LinkStatus,
    pub linked_points: Vec<RecordId>,
    pub linked_resources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeoPoint> for Coordinates {
    fn from(value: GeoPoint) -> Self {
        Self {
            latitude: value.y(),
            longitude: value.x(),
        }
    }
}

/// Status record as emitted by the status list, with points resolved to
/// coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkStatusListItem {
    pub id: RecordId,
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub status: LinkStatus,
    pub linked_points: Vec<Coordinates>,
    pub linked_resources: Vec<String>,
}

impl ToWire for Location {
    type Wire = LocationWire;

    fn to_wire(&self, _graph: &Graph<'_>) -> RepoResult<LocationWire> {
        Ok(LocationWire {
            id: self.id,
            meta: self.meta.clone(),
            kind: self.kind.clone(),
            location_name: self.location_name.clone(),
        })
    }
}

impl ToWire for Element {
    type Wire = ElementWire;

    fn to_wire(&self, _graph: &Graph<'_>) -> RepoResult<ElementWire> {
        Ok(ElementWire {
            id: self.id,
            meta: self.meta.clone(),
            element_name: self.element_name.clone(),
        })
    }
}

impl ToWire for ResourceLink {
    type Wire = ResourceLinkWire;

    fn to_wire(&self, _graph: &Graph<'_>) -> RepoResult<ResourceLinkWire> {
        Ok(ResourceLinkWire {
            id: self.id,
            meta: self.meta.clone(),
            resource_link_name: self.resource_link_name.clone(),
        })
    }
}

impl ToWire for Point {
    type Wire = PointWire;

    fn to_wire(&self, graph: &Graph<'_>) -> RepoResult<PointWire> {
        Ok(PointWire {
            id: self.id,
            meta: self.meta.clone(),
            location: self.location,
            point_type: self.point_type.clone(),
            point_name: self.point_name.clone(),
            geolocation: self.geolocation,
            location_name: graph.location_name(self.location)?,
        })
    }
}

impl ToWire for PointElement {
    type Wire = PointElementWire;

    fn to_wire(&self, graph: &Graph<'_>) -> RepoResult<PointElementWire> {
        Ok(PointElementWire {
            id: self.id,
            meta: self.meta.clone(),
            point: self.point,
            element: self.element,
            point_name: graph.point_name(self.point)?,
            element_name: graph.element_name(self.element)?,
        })
    }
}

impl ToWire for PointResourceLinkStatus {
    type Wire = LinkStatusWire;

    fn to_wire(&self, graph: &Graph<'_>) -> RepoResult<LinkStatusWire> {
        Ok(LinkStatusWire {
            id: self.id,
            meta: self.meta.clone(),
            status: self.status,
            linked_points: self.linked_points.clone(),
            linked_resources: graph.resource_link_names(&self.linked_resources)?,
        })
    }
}
