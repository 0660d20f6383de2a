use std::sync::atomic::{AtomicBool, Ordering};

use console_error_panic_hook::set_once;
use draw::{
    DrawConfig, DrawError, DrawSession, InteractionId, InteractionSpec, MapSurface, Overlay,
    PointerEvent, RecordError, ShapeKind, ShapeRecord,
};
use foundation::ShapeId;
use foundation::math::Vec2;
use layers::StyleOptions;
use layers::vector::{Feature, Geometry, VectorLayer};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

#[wasm_bindgen]
extern "C" {
    /// Map adapter supplied by the page. Every payload crosses as JSON.
    pub type MapHost;

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &MapHost, layer: &str);
    #[wasm_bindgen(method, js_name = addInteraction)]
    fn add_interaction(this: &MapHost, spec: &str);
    #[wasm_bindgen(method, js_name = removeInteraction)]
    fn remove_interaction(this: &MapHost, id: f64);
    #[wasm_bindgen(method, js_name = updateSketch)]
    fn update_sketch(this: &MapHost, id: f64, geometry: &str);
    #[wasm_bindgen(method, js_name = addFeature)]
    fn add_feature(this: &MapHost, feature: &str);
    #[wasm_bindgen(method, js_name = removeFeature)]
    fn remove_feature(this: &MapHost, id: &str) -> bool;
    #[wasm_bindgen(method, js_name = clearFeatures)]
    fn clear_features(this: &MapHost);
    #[wasm_bindgen(method, js_name = addOverlay)]
    fn add_overlay(this: &MapHost, overlay: &str);
    #[wasm_bindgen(method, js_name = removeOverlay)]
    fn remove_overlay(this: &MapHost, id: &str) -> bool;
    #[wasm_bindgen(method, js_name = overlayIds)]
    fn overlay_ids(this: &MapHost) -> js_sys::Array;
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        web_sys::console::error_1(&JsValue::from_str(&format!("encode error: {err}")));
        String::from("null")
    })
}

/// Forwards surface calls to the page's map adapter.
struct JsSurface {
    host: MapHost,
}

impl MapSurface for JsSurface {
    fn add_layer(&mut self, layer: &VectorLayer) {
        self.host.add_layer(&to_json(layer));
    }

    fn add_interaction(&mut self, spec: &InteractionSpec) {
        self.host.add_interaction(&to_json(spec));
    }

    fn remove_interaction(&mut self, id: InteractionId) {
        self.host.remove_interaction(id.0 as f64);
    }

    fn update_sketch(&mut self, id: InteractionId, geometry: &Geometry) {
        self.host.update_sketch(id.0 as f64, &to_json(geometry));
    }

    fn add_feature(&mut self, feature: &Feature) {
        self.host.add_feature(&to_json(feature));
    }

    fn remove_feature(&mut self, id: &ShapeId) -> bool {
        self.host.remove_feature(id.as_str())
    }

    fn clear_features(&mut self) {
        self.host.clear_features();
    }

    fn add_overlay(&mut self, overlay: &Overlay) {
        self.host.add_overlay(&to_json(overlay));
    }

    fn remove_overlay(&mut self, id: &ShapeId) -> bool {
        self.host.remove_overlay(id.as_str())
    }

    fn overlay_ids(&self) -> Vec<ShapeId> {
        self.host
            .overlay_ids()
            .iter()
            .filter_map(|v| v.as_string())
            .map(ShapeId::from)
            .collect()
    }
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_kind(kind: &str) -> Result<ShapeKind, String> {
    kind.parse().map_err(|e: RecordError| e.to_string())
}

fn parse_options(options: Option<String>) -> Result<Option<StyleOptions>, String> {
    options
        .filter(|json| !json.trim().is_empty())
        .map(|json| parse("options", &json))
        .transpose()
}

fn parse<T: serde::de::DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("{what}: {e}"))
}

/// Text a `drawShape` Promise rejects with.
fn rejection(err: &DrawError) -> String {
    err.to_string()
}

/// Draw engine bound to one map.
#[wasm_bindgen]
pub struct WebDraw {
    session: DrawSession<JsSurface>,
}

#[wasm_bindgen]
impl WebDraw {
    /// Creates the engine and adds its vector layer to the map. `config` is an
    /// optional JSON draw config.
    #[wasm_bindgen(constructor)]
    pub fn new(host: MapHost, config: Option<String>) -> Result<WebDraw, JsValue> {
        let config = match config {
            Some(json) => DrawConfig::from_json_str(&json).map_err(js_err)?,
            None => DrawConfig::default(),
        };
        Ok(WebDraw {
            session: DrawSession::new(JsSurface { host }, &config),
        })
    }

    /// Starts drawing `kind`. Resolves with the finished record as JSON and
    /// rejects when the draw is superseded or cancelled.
    #[wasm_bindgen(js_name = drawShape)]
    pub fn draw_shape(
        &mut self,
        kind: &str,
        options: Option<String>,
    ) -> Result<js_sys::Promise, JsValue> {
        let kind = parse_kind(kind).map_err(js_err)?;
        let options = parse_options(options).map_err(js_err)?;
        let handle = self.session.draw(kind, options);
        Ok(future_to_promise(async move {
            let record = handle.await.map_err(|e| js_err(rejection(&e)))?;
            Ok(JsValue::from_str(&record.to_json()))
        }))
    }

    #[wasm_bindgen(js_name = pointerClick)]
    pub fn pointer_click(&mut self, x: f64, y: f64) -> Option<String> {
        self.pointer(PointerEvent::Click(Vec2::new(x, y)))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.pointer(PointerEvent::Move(Vec2::new(x, y)));
    }

    #[wasm_bindgen(js_name = pointerDoubleClick)]
    pub fn pointer_double_click(&mut self, x: f64, y: f64) -> Option<String> {
        self.pointer(PointerEvent::DoubleClick(Vec2::new(x, y)))
    }

    #[wasm_bindgen(js_name = finishDrawing)]
    pub fn finish_drawing(&mut self) -> Option<String> {
        self.session.finish_drawing().map(|r| r.to_json())
    }

    #[wasm_bindgen(js_name = isDrawing)]
    pub fn is_drawing(&self) -> bool {
        self.session.is_drawing()
    }

    /// `rings` is a JSON array of rings of `[x, y]` pairs.
    #[wasm_bindgen(js_name = showPolygon)]
    pub fn show_polygon(
        &mut self,
        id: &str,
        rings: &str,
        options: Option<String>,
    ) -> Result<(), JsValue> {
        let rings = parse("rings", rings).map_err(js_err)?;
        let options = parse_options(options).map_err(js_err)?;
        self.session
            .show_polygon(ShapeId::from(id), rings, options.as_ref())
            .map_err(js_err)
    }

    #[wasm_bindgen(js_name = showCircle)]
    pub fn show_circle(
        &mut self,
        id: &str,
        x: f64,
        y: f64,
        radius: f64,
        options: Option<String>,
    ) -> Result<(), JsValue> {
        let options = parse_options(options).map_err(js_err)?;
        self.session
            .show_circle(ShapeId::from(id), Vec2::new(x, y), radius, options.as_ref())
            .map_err(js_err)
    }

    #[wasm_bindgen(js_name = showText)]
    pub fn show_text(
        &mut self,
        id: &str,
        x: f64,
        y: f64,
        options: Option<String>,
    ) -> Result<(), JsValue> {
        let options = parse_options(options).map_err(js_err)?;
        self.session
            .show_text(ShapeId::from(id), Vec2::new(x, y), options.as_ref())
            .map_err(js_err)
    }

    /// Replays one stored record, e.g. one element of `records()`.
    pub fn show(&mut self, record: &str, options: Option<String>) -> Result<(), JsValue> {
        let record = ShapeRecord::from_json(record).map_err(js_err)?;
        let options = parse_options(options).map_err(js_err)?;
        self.session.show(&record, options.as_ref()).map_err(js_err)
    }

    /// All shapes as a JSON array of records, in insertion order.
    pub fn records(&self) -> String {
        to_json(&self.session.records())
    }

    #[wasm_bindgen(js_name = removeFeatureAndPopup)]
    pub fn remove_feature_and_popup(&mut self, id: &str) -> bool {
        self.session.remove_feature_and_popup(&ShapeId::from(id))
    }

    /// Close-button handler; `data_id` is the button's `data-id` attribute.
    pub fn dismiss(&mut self, data_id: &str) -> bool {
        self.session.dismiss(data_id)
    }

    #[wasm_bindgen(js_name = removeInteraction)]
    pub fn remove_interaction(&mut self) {
        self.session.remove_interaction();
    }

    #[wasm_bindgen(js_name = clearSource)]
    pub fn clear_source(&mut self) {
        self.session.clear_source();
    }

    /// Drains the event log as a JSON array.
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> String {
        to_json(&self.session.drain_events())
    }
}

impl WebDraw {
    fn pointer(&mut self, event: PointerEvent) -> Option<String> {
        self.session.handle_pointer(event).map(|r| r.to_json())
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    set_once();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse, parse_kind, parse_options, rejection};
    use draw::{CancelReason, DrawError, ShapeKind};
    use foundation::math::Vec2;

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!(parse_kind("Rectangle").unwrap(), ShapeKind::Rectangle);
        assert_eq!(parse_kind("linestring").unwrap(), ShapeKind::LineString);
        let err = parse_kind("Hexagon").unwrap_err();
        assert!(err.contains("Hexagon"), "{err}");
    }

    #[test]
    fn options_are_optional() {
        assert_eq!(parse_options(None).unwrap(), None);
        assert_eq!(parse_options(Some("  ".to_string())).unwrap(), None);
        let options = parse_options(Some(r##"{"text":"hi","color":"#f00"}"##.to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(options.text.as_deref(), Some("hi"));
        assert_eq!(options.color.as_deref(), Some("#f00"));
    }

    #[test]
    fn malformed_options_are_rejected() {
        let err = parse_options(Some("{\"text\":".to_string())).unwrap_err();
        assert!(err.starts_with("options:"), "{err}");
        assert!(parse_options(Some("{\"anchor\":\"left\"}".to_string())).is_err());
    }

    #[test]
    fn rings_parse_from_coordinate_arrays() {
        let rings: Vec<Vec<Vec2>> = parse("rings", "[[[0,0],[1,0],[1,1],[0,0]]]").unwrap();
        assert_eq!(rings[0].len(), 4);
        assert_eq!(rings[0][2], Vec2::new(1.0, 1.0));
        let err = parse::<Vec<Vec<Vec2>>>("rings", "[[0,0]]").unwrap_err();
        assert!(err.starts_with("rings:"), "{err}");
    }

    #[test]
    fn cancelled_draws_reject_with_reason() {
        assert_eq!(
            rejection(&DrawError::Cancelled(CancelReason::Superseded)),
            "draw cancelled: superseded by a newer draw"
        );
        assert_eq!(rejection(&DrawError::SessionClosed), "draw session closed");
    }
}
