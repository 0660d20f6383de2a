use foundation::ShapeId;
use foundation::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::layer::{Layer, LayerId};
use crate::symbology::StyleDescriptor;

/// Renderable geometry held by a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Vec2),
    LineString(Vec<Vec2>),
    /// Rings of rings; the first ring is the outer boundary and is closed.
    Polygon(Vec<Vec<Vec2>>),
    Circle { center: Vec2, radius: f64 },
}

/// A geometry bound to an id and a style, as added to the draw layer's source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: ShapeId,
    pub geometry: Geometry,
    pub style: StyleDescriptor,
}

impl Feature {
    pub fn new(id: ShapeId, geometry: Geometry, style: StyleDescriptor) -> Self {
        Self { id, geometry, style }
    }
}

/// The vector layer drawn shapes live on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VectorLayer {
    id: LayerId,
    pub class_name: String,
    pub wrap_x: bool,
}

impl VectorLayer {
    pub fn new(id: LayerId, class_name: impl Into<String>) -> Self {
        Self {
            id,
            class_name: class_name.into(),
            wrap_x: false,
        }
    }
}

impl Layer for VectorLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn wraps_x(&self) -> bool {
        self.wrap_x
    }
}
