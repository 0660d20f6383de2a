use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::Color;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Defaults for text labels drawn next to point icons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub font: String,
    /// Horizontal pixel offset so the label clears the icon.
    pub offset_x: f64,
    pub align: TextAlign,
    pub color: Color,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font: "15px Microsoft YaHei".to_string(),
            offset_x: 20.0,
            align: TextAlign::Left,
            color: Color::WHITE,
        }
    }
}

/// Resolved label ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub text: String,
    pub font: String,
    pub offset_x: f64,
    pub align: TextAlign,
    pub fill: Color,
}

impl LabelStyle {
    /// Builds the label for `text`, honoring a caller supplied CSS color when it parses.
    pub fn label(&self, text: &str, color: Option<&str>) -> TextStyle {
        let fill = match color {
            Some(css) => Color::parse_css(css).unwrap_or_else(|err| {
                warn!("label color {css:?} rejected ({err}); using default");
                self.color
            }),
            None => self.color,
        };
        TextStyle {
            text: text.to_string(),
            font: self.font.clone(),
            offset_x: self.offset_x,
            align: self.align,
            fill,
        }
    }
}
