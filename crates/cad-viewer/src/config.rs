//! Viewer configuration
//!
//! Groups the scene settings with the pointer/keyboard interaction timing and
//! loads them from RON files.

use std::path::Path;
use std::time::Duration;

use cad_scene::{BuildConfig, CameraConfig, OverlayConfig};
use serde::{Deserialize, Serialize};

/// Pointer and keyboard timing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionConfig {
    /// Two pointer-ups closer than this are a double-click (zoom to object)
    pub double_click_ms: u64,
    /// Two deselect gestures closer than this fit the whole scene into view
    pub double_deselect_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 200,
            double_deselect_ms: 1000,
        }
    }
}

impl InteractionConfig {
    pub fn double_click(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    pub fn double_deselect(&self) -> Duration {
        Duration::from_millis(self.double_deselect_ms)
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ViewerConfig {
    /// Primitive generation
    #[serde(default)]
    pub build: BuildConfig,
    /// Highlight / selection outline
    #[serde(default)]
    pub overlay: OverlayConfig,
    /// Camera framing
    #[serde(default)]
    pub camera: CameraConfig,
    /// Interaction timing
    #[serde(default)]
    pub interaction: InteractionConfig,
}

/// Configuration loading errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl ViewerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a RON string; missing sections use their defaults
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Load from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Use light theme outline colors
    pub fn apply_light_theme(&mut self) {
        self.overlay = OverlayConfig {
            line_thickness: self.overlay.line_thickness,
            edge_thickness: self.overlay.edge_thickness,
            ..OverlayConfig::light()
        };
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.interaction.double_click(), Duration::from_millis(200));
        assert_eq!(config.interaction.double_deselect(), Duration::from_secs(1));
        assert!(config.build.generate_edges);
    }

    #[test]
    fn test_partial_ron() {
        let config = ViewerConfig::from_ron_str(
            "(interaction: (double_click_ms: 350, double_deselect_ms: 800))",
        )
        .unwrap();
        assert_eq!(config.interaction.double_click_ms, 350);
        assert_eq!(config.build, BuildConfig::default());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(build: (default_color: (1.0, 1.0, 1.0, 1.0), generate_edges: false))").unwrap();

        let config = ViewerConfig::load(file.path()).unwrap();
        assert!(!config.build.generate_edges);
        assert_eq!(config.build.default_color, [1.0; 4]);
    }

    #[test]
    fn test_invalid_ron() {
        assert!(matches!(
            ViewerConfig::from_ron_str("(build: "),
            Err(ConfigError::Deserialize(_))
        ));
    }

    #[test]
    fn test_light_theme_keeps_thickness() {
        let mut config = ViewerConfig::default();
        config.overlay.line_thickness = 4.0;
        config.apply_light_theme();
        assert_eq!(config.overlay.line_thickness, 4.0);
        assert_eq!(config.overlay.highlight_color, OverlayConfig::light().highlight_color);
    }
}
