//! Headless helpers behind the `sdraw` binary.

use draw::{DrawConfig, DrawSession, PointerEvent, RecordingSurface, ShapeKind, ShapeRecord};
use foundation::math::Vec2;
use layers::StyleOptions;
use serde_json::{Value, json};
use tracing::info;

/// Parses `x,y` into a coordinate.
pub fn parse_coord(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(Vec2::new(x, y))
}

/// Scripted pointer input for one draw.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub clicks: Vec<Vec2>,
    pub double_click: Option<Vec2>,
    pub finish: bool,
}

/// Draws one shape from scripted input and reports its record and popup.
pub fn simulate(
    config: &DrawConfig,
    kind: ShapeKind,
    options: Option<StyleOptions>,
    script: &Script,
) -> Result<Value, String> {
    let mut session = DrawSession::new(RecordingSurface::new(), config);
    let mut handle = session.draw(kind, options);
    for click in &script.clicks {
        session.handle_pointer(PointerEvent::Click(*click));
    }
    if let Some(p) = script.double_click {
        session.handle_pointer(PointerEvent::DoubleClick(p));
    }
    if script.finish {
        session.finish_drawing();
    }

    let record = match handle.try_settle() {
        Some(Ok(record)) => record,
        Some(Err(err)) => return Err(err.to_string()),
        None => {
            return Err(format!(
                "{kind} did not complete after {} clicks; add clicks, --double-click or --finish",
                script.clicks.len()
            ));
        }
    };
    info!("simulated {kind} {}", record.id);

    let popup = session
        .surface()
        .overlay(&record.id)
        .map(|o| json!([o.position.x, o.position.y]));
    let record_value: Value =
        serde_json::from_str(&record.to_json()).map_err(|e| format!("json: {e}"))?;
    Ok(json!({
        "record": record_value,
        "popup": popup,
    }))
}

/// Replays stored records and reports what ended up on the surface.
pub fn replay(config: &DrawConfig, records_json: &str) -> Result<Value, String> {
    let records = ShapeRecord::list_from_json(records_json).map_err(|e| e.to_string())?;
    let mut session = DrawSession::new(RecordingSurface::new(), config);
    for record in &records {
        session
            .show(record, None)
            .map_err(|e| format!("replay {}: {e}", record.id))?;
    }
    info!("replayed {} records", records.len());

    let surface = session.surface();
    Ok(json!({
        "features": serde_json::to_value(surface.features()).map_err(|e| format!("json: {e}"))?,
        "overlays": serde_json::to_value(surface.overlays()).map_err(|e| format!("json: {e}"))?,
    }))
}
