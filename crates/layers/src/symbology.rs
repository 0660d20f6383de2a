//! Style resolution for drawn shapes.
//!
//! Every shape is styled through one of two categories: point-like shapes
//! (points and text) get an icon plus an optional label, line-like shapes
//! (lines, polygons, rectangles, circles) get a translucent fill, a stroke and
//! a vertex marker.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::labels::{LabelStyle, TextStyle};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleCategory {
    Point,
    Line,
}

/// Optional per-shape appearance overrides supplied by the caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    /// Icon image source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<[f64; 2]>,
    /// Label text; a point without it renders icon-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// CSS color of the label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl StyleOptions {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_icon(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconStyle {
    pub src: String,
    pub anchor: [f64; 2],
    pub scale: f64,
    pub cross_origin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    pub icon: IconStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextStyle>,
    pub z_index: i32,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexMarker {
    pub radius: f64,
    pub fill: Color,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub fill: Color,
    pub stroke: Stroke,
    pub vertex: VertexMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum StyleDescriptor {
    Point(PointStyle),
    Line(LineStyle),
}

impl StyleDescriptor {
    pub fn category(&self) -> StyleCategory {
        match self {
            StyleDescriptor::Point(_) => StyleCategory::Point,
            StyleDescriptor::Line(_) => StyleCategory::Line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointSymbology {
    pub icon_src: String,
    pub anchor: [f64; 2],
    pub scale: f64,
    pub z_index: i32,
    pub cross_origin: String,
}

impl Default for PointSymbology {
    fn default() -> Self {
        Self {
            icon_src: "assets/tools/location.png".to_string(),
            anchor: [0.5, 0.5],
            scale: 1.2,
            z_index: 5,
            cross_origin: "anonymous".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSymbology {
    pub fill: Color,
    pub stroke_color: Color,
    pub stroke_width: f64,
    pub vertex_radius: f64,
    pub vertex_fill: Color,
}

impl Default for LineSymbology {
    fn default() -> Self {
        let accent = Color::rgba(0xec, 0x56, 0x61, 1.0);
        Self {
            fill: Color::rgba(255, 255, 255, 0.2),
            stroke_color: accent,
            stroke_width: 2.0,
            vertex_radius: 7.0,
            vertex_fill: accent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Symbology {
    pub point: PointSymbology,
    pub label: LabelStyle,
    pub line: LineSymbology,
}

/// Turns a category plus optional overrides into a concrete style. Pure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleResolver {
    symbology: Symbology,
}

impl StyleResolver {
    pub fn new(symbology: Symbology) -> Self {
        Self { symbology }
    }

    pub fn symbology(&self) -> &Symbology {
        &self.symbology
    }

    pub fn resolve(&self, category: StyleCategory, options: Option<&StyleOptions>) -> StyleDescriptor {
        match category {
            StyleCategory::Point => StyleDescriptor::Point(self.point_style(options)),
            StyleCategory::Line => StyleDescriptor::Line(self.line_style()),
        }
    }

    fn point_style(&self, options: Option<&StyleOptions>) -> PointStyle {
        let defaults = &self.symbology.point;
        let icon = IconStyle {
            src: options
                .and_then(|o| o.src.clone())
                .unwrap_or_else(|| defaults.icon_src.clone()),
            anchor: options.and_then(|o| o.anchor).unwrap_or(defaults.anchor),
            scale: defaults.scale,
            cross_origin: defaults.cross_origin.clone(),
        };
        let text = options.and_then(|o| {
            let text = o.text.as_deref().filter(|t| !t.is_empty())?;
            Some(self.symbology.label.label(text, o.color.as_deref()))
        });
        PointStyle {
            icon,
            text,
            z_index: defaults.z_index,
        }
    }

    fn line_style(&self) -> LineStyle {
        let line = &self.symbology.line;
        LineStyle {
            fill: line.fill,
            stroke: Stroke {
                color: line.stroke_color,
                width: line.stroke_width,
            },
            vertex: VertexMarker {
                radius: line.vertex_radius,
                fill: line.vertex_fill,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StyleCategory, StyleDescriptor, StyleOptions, StyleResolver};
    use crate::labels::TextAlign;
    use pretty_assertions::assert_eq;

    #[test]
    fn point_without_options_uses_default_icon_and_no_label() {
        let resolver = StyleResolver::default();
        let StyleDescriptor::Point(style) = resolver.resolve(StyleCategory::Point, None) else {
            panic!("expected point style");
        };
        assert_eq!(style.icon.src, "assets/tools/location.png");
        assert_eq!(style.icon.anchor, [0.5, 0.5]);
        assert_eq!(style.icon.scale, 1.2);
        assert_eq!(style.z_index, 5);
        assert!(style.text.is_none());
    }

    #[test]
    fn point_options_override_icon_anchor_and_label() {
        let resolver = StyleResolver::default();
        let options = StyleOptions {
            src: Some("marker.png".to_string()),
            anchor: Some([0.5, 1.0]),
            text: Some("Depot".to_string()),
            color: Some("#00ff00".to_string()),
        };
        let StyleDescriptor::Point(style) = resolver.resolve(StyleCategory::Point, Some(&options))
        else {
            panic!("expected point style");
        };
        assert_eq!(style.icon.src, "marker.png");
        assert_eq!(style.icon.anchor, [0.5, 1.0]);
        let label = style.text.expect("label");
        assert_eq!(label.text, "Depot");
        assert_eq!(label.fill.to_css(), "#00ff00");
        assert_eq!(label.align, TextAlign::Left);
    }

    #[test]
    fn line_category_ignores_point_overrides() {
        let resolver = StyleResolver::default();
        let options = StyleOptions::default().with_text("ignored");
        let StyleDescriptor::Line(style) = resolver.resolve(StyleCategory::Line, Some(&options))
        else {
            panic!("expected line style");
        };
        assert_eq!(style.fill.to_css(), "rgba(255, 255, 255, 0.2)");
        assert_eq!(style.stroke.width, 2.0);
        assert_eq!(style.stroke.color.to_css(), "#ec5661");
        assert_eq!(style.vertex.radius, 7.0);
        assert_eq!(style.vertex.fill, style.stroke.color);
    }

    #[test]
    fn descriptor_serializes_with_category_tag() {
        let line = StyleResolver::default().resolve(StyleCategory::Line, None);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["category"], "line");
        assert_eq!(json["stroke"]["color"], "#ec5661");
        assert_eq!(line.category(), StyleCategory::Line);
    }

    #[test]
    fn options_use_host_wire_names() {
        let options: StyleOptions =
            serde_json::from_str(r##"{"src":"a.png","text":"T","color":"#fff"}"##).unwrap();
        assert_eq!(options.src.as_deref(), Some("a.png"));
        assert_eq!(options.text.as_deref(), Some("T"));
        assert!(options.anchor.is_none());
    }
}
