use std::env;
use std::path::Path;

use layers::Symbology;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::popup::PopupConfig;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "SDRAW_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub symbology: Symbology,
    pub popup: PopupConfig,
    /// CSS class of the draw layer.
    pub layer_class: String,
    /// Map-unit distance under which a click counts as hitting an existing vertex.
    pub finish_tolerance: f64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            symbology: Symbology::default(),
            popup: PopupConfig::default(),
            layer_class: "drawLayer".to_string(),
            finish_tolerance: 0.0,
        }
    }
}

impl DrawConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: DrawConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("read {path:?}: {e}")))?;
        Self::from_json_str(&json)
    }

    /// Loads the file named by `SDRAW_CONFIG`, or defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                info!("loading draw config from {path}");
                Self::from_path(path.trim())
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.finish_tolerance.is_finite() || self.finish_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "finish_tolerance must be a non-negative number, got {}",
                self.finish_tolerance
            )));
        }
        if self.popup.circle_anchor.iter().any(|f| !f.is_finite()) {
            return Err(ConfigError::Invalid(
                "popup.circle_anchor must be finite".to_string(),
            ));
        }
        let point = &self.symbology.point;
        if !(point.scale.is_finite() && point.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "symbology.point.scale must be positive, got {}",
                point.scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::DrawConfig;
    use crate::error::ConfigError;
    use std::io::Write;

    #[test]
    fn defaults_match_the_stock_look() {
        let config = DrawConfig::default();
        assert_eq!(config.layer_class, "drawLayer");
        assert_eq!(config.popup.class_name, "close-box");
        assert_eq!(config.popup.circle_anchor, [0.87, 0.5]);
        assert_eq!(config.symbology.line.stroke_color.to_css(), "#ec5661");
        assert_eq!(config.symbology.label.font, "15px Microsoft YaHei");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = DrawConfig::from_json_str(
            r##"{"symbology":{"line":{"stroke_color":"#0000ff"}},"popup":{"icon_src":"x.png"}}"##,
        )
        .unwrap();
        assert_eq!(config.symbology.line.stroke_color.to_css(), "#0000ff");
        assert_eq!(config.symbology.line.stroke_width, 2.0);
        assert_eq!(config.popup.icon_src, "x.png");
        assert_eq!(config.popup.class_name, "close-box");
    }

    #[test]
    fn bad_colors_and_values_are_rejected() {
        assert!(matches!(
            DrawConfig::from_json_str(r#"{"symbology":{"line":{"fill":"chartreuse-ish"}}}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            DrawConfig::from_json_str(r#"{"finish_tolerance":-1}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"layer_class":"annotations"}}"#).unwrap();
        let config = DrawConfig::from_path(file.path()).unwrap();
        assert_eq!(config.layer_class, "annotations");
        assert!(matches!(
            DrawConfig::from_path("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
