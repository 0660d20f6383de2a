//! Serializable shape records.
//!
//! A [`ShapeRecord`] is what a finished draw produces and what replay
//! consumes. On the wire it keeps the host application's layout:
//!
//! ```json
//! {"type": "Circle", "id": "…", "coordinate": [[104.06, 30.57], [0.02]]}
//! ```
//!
//! The coordinate shape depends on the type (a point, a list of points, rings
//! of points, or `[center, [radius]]`); in memory it is a typed
//! [`GeometryPayload`].

use std::str::FromStr;

use foundation::ShapeId;
use foundation::math::Vec2;
use layers::StyleCategory;
use layers::vector::Geometry;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::RecordError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Point,
    LineString,
    Polygon,
    Circle,
    Rectangle,
    Text,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Point,
        ShapeKind::LineString,
        ShapeKind::Polygon,
        ShapeKind::Circle,
        ShapeKind::Rectangle,
        ShapeKind::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Point => "Point",
            ShapeKind::LineString => "LineString",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Circle => "Circle",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Text => "Text",
        }
    }

    /// Points and text are styled as icons, everything else as strokes.
    pub fn style_category(self) -> StyleCategory {
        match self {
            ShapeKind::Point | ShapeKind::Text => StyleCategory::Point,
            ShapeKind::LineString
            | ShapeKind::Polygon
            | ShapeKind::Circle
            | ShapeKind::Rectangle => StyleCategory::Line,
        }
    }

    /// Whether finished shapes of this kind carry a dismiss popup.
    pub fn has_popup(self) -> bool {
        self.style_category() == StyleCategory::Line
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RecordError::UnknownKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryPayload {
    Point(Vec2),
    LineString(Vec<Vec2>),
    Polygon(Vec<Vec<Vec2>>),
    /// Axis-aligned closed 5-point ring, stored like a polygon.
    Rectangle(Vec<Vec<Vec2>>),
    Circle { center: Vec2, radius: f64 },
    Text(Vec2),
}

impl GeometryPayload {
    pub fn kind(&self) -> ShapeKind {
        match self {
            GeometryPayload::Point(_) => ShapeKind::Point,
            GeometryPayload::LineString(_) => ShapeKind::LineString,
            GeometryPayload::Polygon(_) => ShapeKind::Polygon,
            GeometryPayload::Rectangle(_) => ShapeKind::Rectangle,
            GeometryPayload::Circle { .. } => ShapeKind::Circle,
            GeometryPayload::Text(_) => ShapeKind::Text,
        }
    }

    pub fn to_geometry(&self) -> Geometry {
        match self {
            GeometryPayload::Point(p) | GeometryPayload::Text(p) => Geometry::Point(*p),
            GeometryPayload::LineString(points) => Geometry::LineString(points.clone()),
            GeometryPayload::Polygon(rings) | GeometryPayload::Rectangle(rings) => {
                Geometry::Polygon(rings.clone())
            }
            GeometryPayload::Circle { center, radius } => Geometry::Circle {
                center: *center,
                radius: *radius,
            },
        }
    }

    fn coordinate_value(&self) -> Value {
        match self {
            GeometryPayload::Point(p) | GeometryPayload::Text(p) => point_value(*p),
            GeometryPayload::LineString(points) => path_value(points),
            GeometryPayload::Polygon(rings) | GeometryPayload::Rectangle(rings) => {
                Value::Array(rings.iter().map(|r| path_value(r)).collect())
            }
            GeometryPayload::Circle { center, radius } => json!([[center.x, center.y], [radius]]),
        }
    }

    fn from_coordinate(kind: ShapeKind, coordinate: Value) -> Result<Self, RecordError> {
        let bad = |e: serde_json::Error| RecordError::Coordinate {
            kind,
            message: e.to_string(),
        };
        Ok(match kind {
            ShapeKind::Point => {
                GeometryPayload::Point(serde_json::from_value(coordinate).map_err(bad)?)
            }
            ShapeKind::Text => {
                GeometryPayload::Text(serde_json::from_value(coordinate).map_err(bad)?)
            }
            ShapeKind::LineString => {
                GeometryPayload::LineString(serde_json::from_value(coordinate).map_err(bad)?)
            }
            ShapeKind::Polygon => {
                GeometryPayload::Polygon(serde_json::from_value(coordinate).map_err(bad)?)
            }
            ShapeKind::Rectangle => {
                GeometryPayload::Rectangle(serde_json::from_value(coordinate).map_err(bad)?)
            }
            ShapeKind::Circle => {
                let (center, [radius]): (Vec2, [f64; 1]) =
                    serde_json::from_value(coordinate).map_err(bad)?;
                GeometryPayload::Circle { center, radius }
            }
        })
    }
}

fn point_value(p: Vec2) -> Value {
    json!([p.x, p.y])
}

fn path_value(points: &[Vec2]) -> Value {
    Value::Array(points.iter().map(|p| point_value(*p)).collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireRecord", into = "WireRecord")]
pub struct ShapeRecord {
    pub id: ShapeId,
    pub geometry: GeometryPayload,
}

impl ShapeRecord {
    pub fn new(id: ShapeId, geometry: GeometryPayload) -> Self {
        Self { id, geometry }
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn to_json(&self) -> String {
        Value::from(WireRecord::from(self.clone())).to_string()
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let wire: WireRecord =
            serde_json::from_str(json).map_err(|e| RecordError::Json(e.to_string()))?;
        ShapeRecord::try_from(wire)
    }

    /// Parses a JSON array of records, as a host would persist them.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, RecordError> {
        let wires: Vec<WireRecord> =
            serde_json::from_str(json).map_err(|e| RecordError::Json(e.to_string()))?;
        wires.into_iter().map(ShapeRecord::try_from).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireRecord {
    #[serde(rename = "type")]
    kind: ShapeKind,
    id: ShapeId,
    coordinate: Value,
}

impl From<ShapeRecord> for WireRecord {
    fn from(record: ShapeRecord) -> Self {
        WireRecord {
            kind: record.kind(),
            coordinate: record.geometry.coordinate_value(),
            id: record.id,
        }
    }
}

impl From<WireRecord> for Value {
    fn from(wire: WireRecord) -> Self {
        json!({
            "type": wire.kind.as_str(),
            "id": wire.id.as_str(),
            "coordinate": wire.coordinate,
        })
    }
}

impl TryFrom<WireRecord> for ShapeRecord {
    type Error = RecordError;

    fn try_from(wire: WireRecord) -> Result<Self, Self::Error> {
        let geometry = GeometryPayload::from_coordinate(wire.kind, wire.coordinate)?;
        Ok(ShapeRecord {
            id: wire.id,
            geometry,
        })
    }
}
