use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{HexColor, default_palette};
use crate::error::{ConfigError, ConfigResult};
use crate::pen::{DEFAULT_PEN_WIDTH, validate_width};

/// Settings a drawing surface is created with.
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawOverConfig {
    /// Swatches shown in the control panel. The pen starts with the first one.
    pub default_colors: Vec<HexColor>,
    /// Initial pen width in points
    pub pen_width: f32,
    /// Bounds of the width slider
    pub width_range: (f32, f32),
    /// Maximum number of history steps kept, `None` for unbounded
    pub history_limit: Option<usize>,
}

impl Default for DrawOverConfig {
    fn default() -> Self {
        Self {
            default_colors: default_palette(),
            pen_width: DEFAULT_PEN_WIDTH,
            width_range: (0.1, 50.0),
            history_limit: None,
        }
    }
}

impl DrawOverConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_colors.is_empty() {
            return Err(ConfigError::Invalid("default_colors must not be empty".into()));
        }

        validate_width(self.pen_width)
            .map_err(|e| ConfigError::Invalid(format!("pen_width: {e}")))?;

        let (min, max) = self.width_range;
        if validate_width(min).is_err() || !(min <= max) {
            return Err(ConfigError::Invalid(format!(
                "width_range must be positive and ordered, got {min}..={max}"
            )));
        }

        if self.history_limit == Some(0) {
            return Err(ConfigError::Invalid("history_limit must be at least 1".into()));
        }

        Ok(())
    }

    pub fn width_range(&self) -> RangeInclusive<f32> {
        self.width_range.0..=self.width_range.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        DrawOverConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = DrawOverConfig::from_json(r##"{ "pen_width": 8, "history_limit": 20 }"##).unwrap();
        assert_eq!(config.pen_width, 8.0);
        assert_eq!(config.history_limit, Some(20));
        assert_eq!(config.default_colors, default_palette());
    }

    #[test]
    fn test_custom_palette_parsed() {
        let config =
            DrawOverConfig::from_json(r##"{ "default_colors": ["#F00", "#00ff00"] }"##).unwrap();
        assert_eq!(
            config.default_colors,
            vec![HexColor::from_rgb(255, 0, 0), HexColor::from_rgb(0, 255, 0)]
        );
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(matches!(
            DrawOverConfig::from_json(r#"{ "default_colors": [] }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DrawOverConfig::from_json(r#"{ "pen_width": -2 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DrawOverConfig::from_json(r#"{ "width_range": [10, 1] }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            DrawOverConfig::from_json(r#"{ "default_colors": ["blue"] }"#),
            Err(ConfigError::Parse(_))
        ));
    }
}
