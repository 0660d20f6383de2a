//! Dismiss popups anchored next to line-like shapes.

use foundation::ShapeId;
use foundation::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::CIRCLE_ANCHOR_FACTORS;
use crate::surface::MapSurface;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Positioning {
    #[default]
    BottomCenter,
    CenterCenter,
    TopLeft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    pub class_name: String,
    pub icon_src: String,
    /// Pixel offset from the anchor.
    pub offset: [f64; 2],
    pub positioning: Positioning,
    /// Circle popups sit at `center + radius * circle_anchor`.
    pub circle_anchor: [f64; 2],
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            class_name: "close-box".to_string(),
            icon_src: "assets/icons/close.png".to_string(),
            offset: [0.0, 0.0],
            positioning: Positioning::BottomCenter,
            circle_anchor: CIRCLE_ANCHOR_FACTORS,
        }
    }
}

/// The clickable element of a popup. Hosts route a click on it back to
/// `DrawSession::dismiss` with `data_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseAffordance {
    pub class_name: String,
    pub data_id: ShapeId,
    pub icon_src: String,
}

impl CloseAffordance {
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="{}" data-id="{}"><img src="{}"/></div>"#,
            escape_attr(&self.class_name),
            escape_attr(self.data_id.as_str()),
            escape_attr(&self.icon_src),
        )
    }
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A popup overlay, tagged with the id of the shape it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub id: ShapeId,
    pub position: Vec2,
    pub offset: [f64; 2],
    pub positioning: Positioning,
    pub element: CloseAffordance,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PopupController {
    config: PopupConfig,
}

impl PopupController {
    pub fn new(config: PopupConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, id: &ShapeId, anchor: Vec2) -> Overlay {
        Overlay {
            id: id.clone(),
            position: anchor,
            offset: self.config.offset,
            positioning: self.config.positioning,
            element: CloseAffordance {
                class_name: self.config.class_name.clone(),
                data_id: id.clone(),
                icon_src: self.config.icon_src.clone(),
            },
        }
    }

    /// Creates the popup for `id` at `anchor` and adds it to the surface.
    /// The position is fixed from here on.
    pub fn attach<S: MapSurface + ?Sized>(
        &self,
        surface: &mut S,
        id: &ShapeId,
        anchor: Vec2,
    ) -> Overlay {
        let overlay = self.build(id, anchor);
        surface.add_overlay(&overlay);
        debug!("popup attached to {id} at ({}, {})", anchor.x, anchor.y);
        overlay
    }

    /// Removes the overlay tagged `id` from the surface, if there is one.
    pub fn detach<S: MapSurface + ?Sized>(&self, surface: &mut S, id: &ShapeId) -> bool {
        if !surface.overlay_ids().iter().any(|o| o == id) {
            return false;
        }
        surface.remove_overlay(id)
    }
}
