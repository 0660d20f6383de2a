//! Pointer-driven drawing interactions.
//!
//! An interaction collects clicks for one shape kind and reports a live
//! sketch while the pointer moves. Rectangles run as a two-point line whose
//! sketch is already the rectangle ring; text runs as a point.

use foundation::math::Vec2;
use layers::StyleDescriptor;
use layers::vector::Geometry;
use serde::{Deserialize, Serialize};

use crate::geometry::{RawGeometry, close_ring, rectangle_ring};
use crate::record::ShapeKind;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InteractionId(pub u64);

/// Underlying capture mode of an interaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InteractionMode {
    Point,
    LineString { max_points: Option<usize> },
    Polygon,
    Circle,
}

impl InteractionMode {
    pub fn for_kind(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Point | ShapeKind::Text => InteractionMode::Point,
            ShapeKind::LineString => InteractionMode::LineString { max_points: None },
            ShapeKind::Rectangle => InteractionMode::LineString {
                max_points: Some(2),
            },
            ShapeKind::Polygon => InteractionMode::Polygon,
            ShapeKind::Circle => InteractionMode::Circle,
        }
    }
}

/// What the map surface is told about an activated interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionSpec {
    pub id: InteractionId,
    pub kind: ShapeKind,
    pub mode: InteractionMode,
    /// Style of the in-progress sketch.
    pub style: StyleDescriptor,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Click(Vec2),
    Move(Vec2),
    DoubleClick(Vec2),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Unchanged,
    Sketch(Geometry),
    Complete(RawGeometry),
}

#[derive(Debug, Clone)]
pub struct Interaction {
    spec: InteractionSpec,
    vertices: Vec<Vec2>,
    cursor: Option<Vec2>,
    /// Distance under which a click lands "on" an existing vertex.
    tolerance: f64,
}

impl Interaction {
    pub fn new(id: InteractionId, kind: ShapeKind, style: StyleDescriptor, tolerance: f64) -> Self {
        Self {
            spec: InteractionSpec {
                id,
                kind,
                mode: InteractionMode::for_kind(kind),
                style,
            },
            vertices: Vec::new(),
            cursor: None,
            tolerance: tolerance.max(0.0),
        }
    }

    pub fn spec(&self) -> &InteractionSpec {
        &self.spec
    }

    pub fn id(&self) -> InteractionId {
        self.spec.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.spec.kind
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn handle(&mut self, event: PointerEvent) -> Step {
        match event {
            PointerEvent::Move(p) => {
                self.cursor = Some(p);
                self.sketch().map_or(Step::Unchanged, Step::Sketch)
            }
            PointerEvent::Click(p) => self.click(p, false),
            PointerEvent::DoubleClick(p) => self.click(p, true),
        }
    }

    fn click(&mut self, p: Vec2, double: bool) -> Step {
        self.cursor = Some(p);
        match self.spec.mode {
            InteractionMode::Point => Step::Complete(RawGeometry::Point(p)),
            InteractionMode::Circle => match self.vertices.first() {
                None => {
                    self.vertices.push(p);
                    self.sketch().map_or(Step::Unchanged, Step::Sketch)
                }
                Some(&center) => Step::Complete(RawGeometry::Circle {
                    center,
                    radius: center.distance(p),
                }),
            },
            InteractionMode::LineString { max_points } => {
                if self.vertices.len() >= 2 && self.near_last(p) {
                    return Step::Complete(RawGeometry::Path(self.vertices.clone()));
                }
                self.push_vertex(p);
                let full = max_points.is_some_and(|max| self.vertices.len() >= max);
                if full || (double && self.vertices.len() >= 2) {
                    return Step::Complete(RawGeometry::Path(self.vertices.clone()));
                }
                self.sketch().map_or(Step::Unchanged, Step::Sketch)
            }
            InteractionMode::Polygon => {
                if self.vertices.len() >= 3 && self.near_first(p) {
                    return Step::Complete(RawGeometry::Path(self.vertices.clone()));
                }
                self.push_vertex(p);
                if double && self.vertices.len() >= 3 {
                    return Step::Complete(RawGeometry::Path(self.vertices.clone()));
                }
                self.sketch().map_or(Step::Unchanged, Step::Sketch)
            }
        }
    }

    /// Completes with what has been clicked so far, if that is enough.
    pub fn finish(&self) -> Option<RawGeometry> {
        match self.spec.mode {
            InteractionMode::Point => None,
            InteractionMode::Circle => {
                let center = *self.vertices.first()?;
                let edge = self.cursor?;
                Some(RawGeometry::Circle {
                    center,
                    radius: center.distance(edge),
                })
            }
            InteractionMode::LineString { .. } => {
                (self.vertices.len() >= 2).then(|| RawGeometry::Path(self.vertices.clone()))
            }
            InteractionMode::Polygon => {
                (self.vertices.len() >= 3).then(|| RawGeometry::Path(self.vertices.clone()))
            }
        }
    }

    /// Live preview: clicked vertices plus the pointer position.
    pub fn sketch(&self) -> Option<Geometry> {
        let cursor = self.cursor;
        match self.spec.mode {
            InteractionMode::Point => cursor.map(Geometry::Point),
            InteractionMode::Circle => {
                let center = *self.vertices.first()?;
                let radius = cursor.map_or(0.0, |c| center.distance(c));
                Some(Geometry::Circle { center, radius })
            }
            InteractionMode::LineString { .. } if self.spec.kind == ShapeKind::Rectangle => {
                let start = *self.vertices.first()?;
                let end = cursor.unwrap_or(start);
                Some(Geometry::Polygon(vec![rectangle_ring(start, end)]))
            }
            InteractionMode::LineString { .. } => {
                let points = self.with_cursor();
                (!points.is_empty()).then_some(Geometry::LineString(points))
            }
            InteractionMode::Polygon => {
                let points = self.with_cursor();
                match points.len() {
                    0 => None,
                    1 | 2 => Some(Geometry::LineString(points)),
                    _ => Some(Geometry::Polygon(vec![close_ring(&points)])),
                }
            }
        }
    }

    fn with_cursor(&self) -> Vec<Vec2> {
        let mut points = self.vertices.clone();
        if let Some(c) = self.cursor
            && points.last().is_none_or(|last| !self.same_spot(*last, c))
        {
            points.push(c);
        }
        points
    }

    fn push_vertex(&mut self, p: Vec2) {
        if self.vertices.last().is_none_or(|last| !self.same_spot(*last, p)) {
            self.vertices.push(p);
        }
    }

    fn near_first(&self, p: Vec2) -> bool {
        self.vertices.first().is_some_and(|v| self.same_spot(*v, p))
    }

    fn near_last(&self, p: Vec2) -> bool {
        self.vertices.last().is_some_and(|v| self.same_spot(*v, p))
    }

    fn same_spot(&self, a: Vec2, b: Vec2) -> bool {
        a.distance(b) <= self.tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::{Interaction, InteractionId, InteractionMode, PointerEvent, Step};
    use crate::geometry::{RawGeometry, rectangle_ring};
    use crate::record::ShapeKind;
    use foundation::math::Vec2;
    use layers::vector::Geometry;
    use layers::{StyleCategory, StyleResolver};

    fn v(x: f64, y: f64) -> Vec2 {
        Vec2::new(x, y)
    }

    fn interaction(kind: ShapeKind) -> Interaction {
        let style = StyleResolver::default().resolve(StyleCategory::Line, None);
        Interaction::new(InteractionId(1), kind, style, 0.0)
    }

    #[test]
    fn modes_follow_kind() {
        assert_eq!(InteractionMode::for_kind(ShapeKind::Text), InteractionMode::Point);
        assert_eq!(
            InteractionMode::for_kind(ShapeKind::Rectangle),
            InteractionMode::LineString {
                max_points: Some(2)
            }
        );
        assert_eq!(
            InteractionMode::for_kind(ShapeKind::LineString),
            InteractionMode::LineString { max_points: None }
        );
    }

    #[test]
    fn point_completes_on_first_click() {
        let mut it = interaction(ShapeKind::Point);
        assert_eq!(
            it.handle(PointerEvent::Move(v(1.0, 1.0))),
            Step::Sketch(Geometry::Point(v(1.0, 1.0)))
        );
        assert_eq!(
            it.handle(PointerEvent::Click(v(2.0, 3.0))),
            Step::Complete(RawGeometry::Point(v(2.0, 3.0)))
        );
    }

    #[test]
    fn rectangle_sketches_ring_and_completes_on_second_click() {
        let mut it = interaction(ShapeKind::Rectangle);
        assert!(matches!(it.handle(PointerEvent::Click(v(0.0, 0.0))), Step::Sketch(_)));
        assert_eq!(
            it.handle(PointerEvent::Move(v(4.0, 2.0))),
            Step::Sketch(Geometry::Polygon(vec![rectangle_ring(v(0.0, 0.0), v(4.0, 2.0))]))
        );
        assert_eq!(
            it.handle(PointerEvent::Click(v(5.0, 3.0))),
            Step::Complete(RawGeometry::Path(vec![v(0.0, 0.0), v(5.0, 3.0)]))
        );
    }

    #[test]
    fn line_completes_on_double_click_or_click_on_last_vertex() {
        let mut it = interaction(ShapeKind::LineString);
        it.handle(PointerEvent::Click(v(0.0, 0.0)));
        it.handle(PointerEvent::Click(v(1.0, 0.0)));
        assert_eq!(
            it.handle(PointerEvent::DoubleClick(v(2.0, 1.0))),
            Step::Complete(RawGeometry::Path(vec![v(0.0, 0.0), v(1.0, 0.0), v(2.0, 1.0)]))
        );

        let mut it = interaction(ShapeKind::LineString);
        it.handle(PointerEvent::Click(v(0.0, 0.0)));
        it.handle(PointerEvent::Click(v(1.0, 0.0)));
        assert_eq!(
            it.handle(PointerEvent::Click(v(1.0, 0.0))),
            Step::Complete(RawGeometry::Path(vec![v(0.0, 0.0), v(1.0, 0.0)]))
        );
    }

    #[test]
    fn single_vertex_double_click_does_not_complete_line() {
        let mut it = interaction(ShapeKind::LineString);
        assert!(matches!(
            it.handle(PointerEvent::DoubleClick(v(0.0, 0.0))),
            Step::Sketch(_)
        ));
        assert!(it.finish().is_none());
    }

    #[test]
    fn polygon_closes_on_first_vertex() {
        let mut it = interaction(ShapeKind::Polygon);
        for p in [v(0.0, 0.0), v(2.0, 0.0), v(2.0, 2.0)] {
            it.handle(PointerEvent::Click(p));
        }
        assert!(matches!(it.sketch(), Some(Geometry::Polygon(_))));
        assert_eq!(
            it.handle(PointerEvent::Click(v(0.0, 0.0))),
            Step::Complete(RawGeometry::Path(vec![v(0.0, 0.0), v(2.0, 0.0), v(2.0, 2.0)]))
        );
    }

    #[test]
    fn polygon_respects_tolerance() {
        let style = StyleResolver::default().resolve(StyleCategory::Line, None);
        let mut it = Interaction::new(InteractionId(2), ShapeKind::Polygon, style, 0.5);
        for p in [v(0.0, 0.0), v(2.0, 0.0), v(2.0, 2.0)] {
            it.handle(PointerEvent::Click(p));
        }
        assert!(matches!(
            it.handle(PointerEvent::Click(v(0.3, 0.2))),
            Step::Complete(RawGeometry::Path(points)) if points.len() == 3
        ));
    }

    #[test]
    fn circle_uses_center_then_edge() {
        let mut it = interaction(ShapeKind::Circle);
        it.handle(PointerEvent::Click(v(1.0, 1.0)));
        assert_eq!(
            it.handle(PointerEvent::Move(v(4.0, 5.0))),
            Step::Sketch(Geometry::Circle {
                center: v(1.0, 1.0),
                radius: 5.0
            })
        );
        assert_eq!(
            it.finish(),
            Some(RawGeometry::Circle {
                center: v(1.0, 1.0),
                radius: 5.0
            })
        );
        assert_eq!(
            it.handle(PointerEvent::Click(v(1.0, 4.0))),
            Step::Complete(RawGeometry::Circle {
                center: v(1.0, 1.0),
                radius: 3.0
            })
        );
    }

    #[test]
    fn finish_requires_enough_vertices() {
        let mut it = interaction(ShapeKind::Polygon);
        it.handle(PointerEvent::Click(v(0.0, 0.0)));
        it.handle(PointerEvent::Click(v(1.0, 0.0)));
        assert!(it.finish().is_none());
        it.handle(PointerEvent::Click(v(1.0, 1.0)));
        assert_eq!(it.finish(), Some(RawGeometry::Path(it.vertices().to_vec())));

        let mut rect = interaction(ShapeKind::Rectangle);
        rect.handle(PointerEvent::Click(v(0.0, 0.0)));
        assert!(rect.finish().is_none());
    }
}
