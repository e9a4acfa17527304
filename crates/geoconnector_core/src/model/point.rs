//! Point model and geographic coordinate type.
//!
//! # Responsibility
//! - Define the stored point shape and its GeoJSON coordinate encoding.
//!
//! # Invariants
//! - `geolocation` is unique across all points.
//! - `point_name` is unique when set; blank names are stored as `None`.
//! - Latitude stays within [-90, 90] and longitude within [-180, 180].

use super::base::{default_active, Record, RecordId, RecordMeta};
use super::validation::{limit_text, require_text, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// WGS84 coordinate pair. `longitude` is x, `latitude` is y.
///
/// Serialized as a GeoJSON point: `{"type": "Point", "coordinates": [x, y]}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoJsonPoint", into = "GeoJsonPoint")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Horizontal component.
    pub fn x(&self) -> f64 {
        self.longitude
    }

    /// Vertical component.
    pub fn y(&self) -> f64 {
        self.latitude
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::OutOfRange {
                field: "geolocation.latitude",
                value: self.latitude,
            });
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidationError::OutOfRange {
                field: "geolocation.longitude",
                value: self.longitude,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeoJsonPoint {
    #[serde(rename = "type")]
    kind: String,
    coordinates: [f64; 2],
}

/// Rejected GeoJSON geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryError(String);

impl Display for GeometryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "expected a GeoJSON Point geometry, got `{}`", self.0)
    }
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = GeometryError;

    fn try_from(value: GeoJsonPoint) -> Result<Self, Self::Error> {
        if value.kind != "Point" {
            return Err(GeometryError(value.kind));
        }
        let [longitude, latitude] = value.coordinates;
        Ok(Self {
            longitude,
            latitude,
        })
    }
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(value: GeoPoint) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [value.longitude, value.latitude],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub id: RecordId,
    pub meta: RecordMeta,
    /// Owning location.
    pub location: RecordId,
    pub point_type: String,
    pub point_name: Option<String>,
    pub geolocation: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointDraft {
    pub location: RecordId,
    pub point_type: String,
    #[serde(default)]
    pub point_name: Option<String>,
    pub geolocation: GeoPoint,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl PointDraft {
    pub fn new(location: RecordId, point_type: impl Into<String>, geolocation: GeoPoint) -> Self {
        Self {
            location,
            point_type: point_type.into(),
            point_name: None,
            geolocation,
            active: true,
        }
    }

    pub fn with_name(mut self, point_name: impl Into<String>) -> Self {
        self.point_name = Some(point_name.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("point_type", &self.point_type)?;
        if let Some(name) = self.point_name.as_deref() {
            limit_text("point_name", name)?;
        }
        self.geolocation.validate()
    }

    /// Name as persisted: trimmed-empty names collapse to `None`.
    pub fn stored_point_name(&self) -> Option<&str> {
        self.point_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }
}

impl Record for Point {
    type Draft = PointDraft;
    const ENTITY: &'static str = "point";

    fn id(&self) -> RecordId {
        self.id
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn to_draft(&self) -> PointDraft {
        PointDraft {
            location: self.location,
            point_type: self.point_type.clone(),
            point_name: self.point_name.clone(),
            geolocation: self.geolocation,
            active: self.meta.active,
        }
    }
}
