//! Showing stored shapes again without interactive drawing.

use foundation::ShapeId;
use foundation::math::Vec2;
use layers::StyleOptions;

use crate::error::ReplayError;
use crate::record::{GeometryPayload, ShapeRecord};
use crate::session::{DrawSession, Origin};
use crate::surface::MapSurface;

impl<S: MapSurface> DrawSession<S> {
    /// Shows a polygon from its rings. The popup sits on the fourth point of
    /// the first ring, which for a stored rectangle is the same corner used
    /// at draw time.
    pub fn show_polygon(
        &mut self,
        id: ShapeId,
        rings: Vec<Vec<Vec2>>,
        options: Option<&StyleOptions>,
    ) -> Result<(), ReplayError> {
        self.show(&ShapeRecord::new(id, GeometryPayload::Polygon(rings)), options)
    }

    pub fn show_circle(
        &mut self,
        id: ShapeId,
        center: Vec2,
        radius: f64,
        options: Option<&StyleOptions>,
    ) -> Result<(), ReplayError> {
        self.show(
            &ShapeRecord::new(id, GeometryPayload::Circle { center, radius }),
            options,
        )
    }

    /// Shows a text label (a styled point, never with a popup).
    pub fn show_text(
        &mut self,
        id: ShapeId,
        coordinate: Vec2,
        options: Option<&StyleOptions>,
    ) -> Result<(), ReplayError> {
        self.show(&ShapeRecord::new(id, GeometryPayload::Text(coordinate)), options)
    }

    pub fn show_line(
        &mut self,
        id: ShapeId,
        points: Vec<Vec2>,
        options: Option<&StyleOptions>,
    ) -> Result<(), ReplayError> {
        self.show(&ShapeRecord::new(id, GeometryPayload::LineString(points)), options)
    }

    pub fn show_point(
        &mut self,
        id: ShapeId,
        coordinate: Vec2,
        options: Option<&StyleOptions>,
    ) -> Result<(), ReplayError> {
        self.show(&ShapeRecord::new(id, GeometryPayload::Point(coordinate)), options)
    }

    /// Shows any stored record through the path matching its type.
    pub fn show(
        &mut self,
        record: &ShapeRecord,
        options: Option<&StyleOptions>,
    ) -> Result<(), ReplayError> {
        validate(record)?;
        self.install(record.clone(), options, Origin::Replayed);
        Ok(())
    }
}

fn validate(record: &ShapeRecord) -> Result<(), ReplayError> {
    let empty = || ReplayError::EmptyGeometry {
        id: record.id.to_string(),
    };
    match &record.geometry {
        GeometryPayload::Point(_) | GeometryPayload::Text(_) => Ok(()),
        GeometryPayload::LineString(points) if points.is_empty() => Err(empty()),
        GeometryPayload::LineString(_) => Ok(()),
        GeometryPayload::Polygon(rings) | GeometryPayload::Rectangle(rings) => {
            match rings.first() {
                Some(ring) if !ring.is_empty() => Ok(()),
                _ => Err(empty()),
            }
        }
        GeometryPayload::Circle { radius, .. } if !radius.is_finite() || *radius < 0.0 => {
            Err(ReplayError::InvalidRadius {
                id: record.id.to_string(),
                radius: *radius,
            })
        }
        GeometryPayload::Circle { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DrawConfig;
    use crate::error::ReplayError;
    use crate::interaction::PointerEvent;
    use crate::record::{GeometryPayload, ShapeKind, ShapeRecord};
    use crate::session::DrawSession;
    use crate::surface::RecordingSurface;
    use foundation::ShapeId;
    use foundation::math::Vec2;
    use layers::vector::Geometry;
    use layers::{StyleCategory, StyleDescriptor, StyleOptions};
    use pretty_assertions::assert_eq;

    fn v(x: f64, y: f64) -> Vec2 {
        Vec2::new(x, y)
    }

    fn session() -> DrawSession<RecordingSurface> {
        DrawSession::new(RecordingSurface::new(), &DrawConfig::default())
    }

    #[test]
    fn drawn_circle_replays_to_same_center_radius_and_popup() {
        let mut drawn = session();
        drawn.draw(ShapeKind::Circle, None);
        drawn.handle_pointer(PointerEvent::Click(v(2.0, 3.0)));
        let record = drawn
            .handle_pointer(PointerEvent::Click(v(2.0, 8.0)))
            .unwrap();
        let original_popup = drawn.surface().overlay(&record.id).unwrap().position;

        // Through the persisted wire form, as a host would.
        let stored = ShapeRecord::from_json(&record.to_json()).unwrap();
        let GeometryPayload::Circle { center, radius } = stored.geometry else {
            panic!("expected circle payload");
        };

        let mut replayed = session();
        replayed
            .show_circle(stored.id.clone(), center, radius, None)
            .unwrap();
        let feature = replayed.surface().feature(&record.id).unwrap();
        assert_eq!(
            feature.geometry,
            Geometry::Circle {
                center: v(2.0, 3.0),
                radius: 5.0
            }
        );
        assert_eq!(
            replayed.surface().overlay(&record.id).unwrap().position,
            original_popup
        );
    }

    #[test]
    fn drawn_rectangle_replays_as_identical_polygon_ring() {
        let mut drawn = session();
        drawn.draw(ShapeKind::Rectangle, None);
        drawn.handle_pointer(PointerEvent::Click(v(-1.0, 4.0)));
        let record = drawn
            .handle_pointer(PointerEvent::Click(v(6.0, -2.0)))
            .unwrap();
        let GeometryPayload::Rectangle(rings) = record.geometry.clone() else {
            panic!("expected rectangle payload");
        };
        let original_popup = drawn.surface().overlay(&record.id).unwrap().position;

        let mut replayed = session();
        replayed
            .show_polygon(record.id.clone(), rings.clone(), None)
            .unwrap();
        assert_eq!(
            replayed.surface().feature(&record.id).unwrap().geometry,
            Geometry::Polygon(rings.clone())
        );
        assert_eq!(
            replayed.surface().overlay(&record.id).unwrap().position,
            original_popup
        );
        let records = replayed.records();
        let GeometryPayload::Polygon(replayed_rings) = &records[0].geometry else {
            panic!("expected polygon payload");
        };
        assert_eq!(replayed_rings, &rings);
    }

    #[test]
    fn text_replay_is_point_styled_without_popup() {
        let mut s = session();
        let options = StyleOptions::default().with_text("Gate 3");
        s.show_text(ShapeId::new("t1"), v(1.0, 1.0), Some(&options))
            .unwrap();
        let feature = s.surface().feature(&ShapeId::new("t1")).unwrap();
        assert_eq!(feature.geometry, Geometry::Point(v(1.0, 1.0)));
        let StyleDescriptor::Point(style) = &feature.style else {
            panic!("expected point style");
        };
        assert_eq!(style.text.as_ref().unwrap().text, "Gate 3");
        assert!(s.surface().overlays().is_empty());
        assert_eq!(s.surface().overlays_added(), 0);
    }

    #[test]
    fn generic_show_dispatches_every_kind() {
        let json = r#"[
            {"type":"Point","id":"p","coordinate":[0,0]},
            {"type":"Text","id":"t","coordinate":[1,1]},
            {"type":"LineString","id":"l","coordinate":[[0,0],[2,2]]},
            {"type":"Polygon","id":"g","coordinate":[[[0,0],[1,0],[1,1],[0,0]]]},
            {"type":"Rectangle","id":"r","coordinate":[[[0,0],[0,1],[1,1],[1,0],[0,0]]]},
            {"type":"Circle","id":"c","coordinate":[[5,5],[1]]}
        ]"#;
        let records = ShapeRecord::list_from_json(json).unwrap();
        let mut s = session();
        for record in &records {
            s.show(record, None).unwrap();
        }
        assert_eq!(s.len(), 6);
        assert_eq!(s.surface().overlays().len(), 4);
        assert_eq!(s.records(), records);
        assert_eq!(
            s.surface().overlay(&ShapeId::new("l")).unwrap().position,
            v(0.0, 0.0)
        );
        assert_eq!(
            s.surface().overlay(&ShapeId::new("r")).unwrap().position,
            v(1.0, 0.0)
        );
        for id in ["p", "t"] {
            let feature = s.surface().feature(&ShapeId::new(id)).unwrap();
            assert_eq!(feature.style.category(), StyleCategory::Point);
        }
    }

    #[test]
    fn replaying_same_id_replaces_shape() {
        let mut s = session();
        let id = ShapeId::new("dup");
        s.show_circle(id.clone(), v(0.0, 0.0), 1.0, None).unwrap();
        s.show_circle(id.clone(), v(10.0, 0.0), 2.0, None).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.surface().features().len(), 1);
        assert_eq!(s.surface().overlays().len(), 1);
        assert_eq!(
            s.surface().overlay(&id).unwrap().position,
            v(10.0 + 2.0 * 0.87, 1.0)
        );
    }

    #[test]
    fn short_polygon_ring_anchors_on_last_vertex() {
        let mut s = session();
        let id = ShapeId::new("short");
        s.show_polygon(id.clone(), vec![vec![v(0.0, 0.0), v(3.0, 0.0), v(0.0, 0.0)]], None)
            .unwrap();
        assert_eq!(s.surface().overlay(&id).unwrap().position, v(0.0, 0.0));
    }

    #[test]
    fn malformed_replays_are_rejected_without_side_effects() {
        let mut s = session();
        assert_eq!(
            s.show_polygon(ShapeId::new("e"), vec![], None),
            Err(ReplayError::EmptyGeometry {
                id: "e".to_string()
            })
        );
        assert!(matches!(
            s.show_circle(ShapeId::new("n"), v(0.0, 0.0), -1.0, None),
            Err(ReplayError::InvalidRadius { .. })
        ));
        assert!(s.show_line(ShapeId::new("l"), vec![], None).is_err());
        assert!(s.is_empty());
        assert!(s.surface().features().is_empty());
    }

    #[test]
    fn replayed_shapes_can_be_dismissed() {
        let mut s = session();
        s.show_point(ShapeId::new("p"), v(0.0, 0.0), None).unwrap();
        s.show_line(ShapeId::new("l"), vec![v(0.0, 0.0), v(1.0, 1.0)], None)
            .unwrap();
        assert!(s.dismiss("l"));
        assert_eq!(s.len(), 1);
        assert!(s.surface().overlays().is_empty());
    }

    #[test]
    fn configured_popup_positioning_and_label_alignment_reach_the_surface() {
        let config = DrawConfig::from_json_str(
            r#"{"popup":{"positioning":"top-left"},"symbology":{"label":{"align":"right"}}}"#,
        )
        .unwrap();
        let mut s = DrawSession::new(RecordingSurface::new(), &config);
        s.show_circle(ShapeId::new("c"), v(0.0, 0.0), 1.0, None)
            .unwrap();
        s.show_text(
            ShapeId::new("t"),
            v(2.0, 2.0),
            Some(&StyleOptions::default().with_text("label")),
        )
        .unwrap();

        let overlay = s.surface().overlay(&ShapeId::new("c")).unwrap();
        assert_eq!(overlay.positioning, crate::popup::Positioning::TopLeft);
        let feature = s.surface().feature(&ShapeId::new("t")).unwrap();
        let StyleDescriptor::Point(point) = &feature.style else {
            panic!("text should be point styled");
        };
        let text = point.text.as_ref().unwrap();
        assert_eq!(text.align, layers::labels::TextAlign::Right);

        let centered =
            DrawConfig::from_json_str(r#"{"popup":{"positioning":"center-center"}}"#).unwrap();
        assert_eq!(
            centered.popup.positioning,
            crate::popup::Positioning::CenterCenter
        );
    }
}
