//! Geometry derivation: from raw interaction output to finished shape
//! geometry plus the popup anchor.

use foundation::math::Vec2;
use layers::vector::Geometry;
use tracing::warn;

use crate::error::GeometryError;
use crate::record::{GeometryPayload, ShapeKind};

/// Offset factors of the circle popup anchor relative to the radius.
pub const CIRCLE_ANCHOR_FACTORS: [f64; 2] = [0.87, 0.5];

/// Index of the ring vertex that carries a polygon's popup. For a rectangle
/// ring this is the `(end.x, start.y)` corner.
pub const POLYGON_ANCHOR_VERTEX: usize = 3;

/// What an interaction hands over when it completes.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGeometry {
    Point(Vec2),
    /// Clicked vertices in order; polygons are not closed yet.
    Path(Vec<Vec2>),
    Circle { center: Vec2, radius: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Finalized {
    pub payload: GeometryPayload,
    pub popup_anchor: Option<Vec2>,
}

impl Finalized {
    pub fn geometry(&self) -> Geometry {
        self.payload.to_geometry()
    }
}

/// Closed axis-aligned ring spanned by two opposite corners:
/// `start, (start.x, end.y), end, (end.x, start.y), start`.
pub fn rectangle_ring(start: Vec2, end: Vec2) -> Vec<Vec2> {
    vec![
        start,
        Vec2::new(start.x, end.y),
        end,
        Vec2::new(end.x, start.y),
        start,
    ]
}

pub fn circle_popup_anchor(center: Vec2, radius: f64, factors: [f64; 2]) -> Vec2 {
    center + Vec2::new(radius, radius).scale(Vec2::from(factors))
}

/// Popup anchor of a ring: its fourth point, or the last point of rings
/// shorter than that.
pub fn ring_popup_anchor(ring: &[Vec2]) -> Option<Vec2> {
    ring.get(POLYGON_ANCHOR_VERTEX).or(ring.last()).copied()
}

/// Appends the first vertex unless the ring already ends on it.
pub fn close_ring(points: &[Vec2]) -> Vec<Vec2> {
    let mut ring = points.to_vec();
    if let (Some(first), Some(last)) = (points.first(), points.last())
        && (points.len() == 1 || first != last)
    {
        ring.push(*first);
    }
    ring
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeometryDeriver {
    circle_anchor: [f64; 2],
}

impl Default for GeometryDeriver {
    fn default() -> Self {
        Self::new(CIRCLE_ANCHOR_FACTORS)
    }
}

impl GeometryDeriver {
    pub fn new(circle_anchor: [f64; 2]) -> Self {
        Self { circle_anchor }
    }

    /// Turns raw interaction output into the shape's payload.
    ///
    /// Rectangles expect exactly two corners; lines need two vertices and
    /// polygons three. The interaction guarantees these counts, anything else
    /// is reported rather than guessed at.
    pub fn finalize(&self, kind: ShapeKind, raw: RawGeometry) -> Result<Finalized, GeometryError> {
        let payload = match (kind, raw) {
            (ShapeKind::Point, RawGeometry::Point(p)) => GeometryPayload::Point(p),
            (ShapeKind::Text, RawGeometry::Point(p)) => GeometryPayload::Text(p),
            (ShapeKind::LineString, RawGeometry::Path(points)) => {
                require_min(kind, &points, 2)?;
                GeometryPayload::LineString(points)
            }
            (ShapeKind::Polygon, RawGeometry::Path(points)) => {
                require_min(kind, &points, 3)?;
                GeometryPayload::Polygon(vec![close_ring(&points)])
            }
            (ShapeKind::Rectangle, RawGeometry::Path(points)) => {
                let [start, end] = points.as_slice() else {
                    return Err(GeometryError::VertexCount {
                        kind,
                        expected: 2,
                        got: points.len(),
                    });
                };
                GeometryPayload::Rectangle(vec![rectangle_ring(*start, *end)])
            }
            (ShapeKind::Circle, RawGeometry::Circle { center, radius }) => {
                GeometryPayload::Circle { center, radius }
            }
            (kind, _) => return Err(GeometryError::UnexpectedInput { kind }),
        };
        let popup_anchor = self.popup_anchor(&payload);
        Ok(Finalized {
            payload,
            popup_anchor,
        })
    }

    /// Where the dismiss popup of a shape sits. `None` for points and text.
    pub fn popup_anchor(&self, payload: &GeometryPayload) -> Option<Vec2> {
        match payload {
            GeometryPayload::Point(_) | GeometryPayload::Text(_) => None,
            GeometryPayload::LineString(points) => points.first().copied(),
            GeometryPayload::Polygon(rings) | GeometryPayload::Rectangle(rings) => {
                let ring = rings.first()?;
                if ring.len() <= POLYGON_ANCHOR_VERTEX {
                    warn!(
                        "ring has {} points; anchoring popup at its last vertex",
                        ring.len()
                    );
                }
                ring_popup_anchor(ring)
            }
            GeometryPayload::Circle { center, radius } => {
                Some(circle_popup_anchor(*center, *radius, self.circle_anchor))
            }
        }
    }
}

fn require_min(kind: ShapeKind, points: &[Vec2], min: usize) -> Result<(), GeometryError> {
    if points.len() < min {
        return Err(GeometryError::TooFewVertices {
            kind,
            min,
            got: points.len(),
        });
    }
    Ok(())
}
