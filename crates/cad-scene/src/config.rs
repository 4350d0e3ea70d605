//! Scene configuration structures
//!
//! Settings for primitive generation and for the highlight/selection overlay.
//! Both can be serialized and loaded from configuration files.

use cad_core::constants::DEFAULT_COLOR;
use serde::{Deserialize, Serialize};

/// Primitive generation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildConfig {
    /// Color for faces when neither the face nor the part has one (RGBA)
    pub default_color: [f32; 4],
    /// Whether edge wireframe primitives are generated
    pub generate_edges: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR,
            generate_edges: true,
        }
    }
}

/// Highlight / selection overlay configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayConfig {
    /// Face edge wireframe color (RGBA)
    pub edge_color: [f32; 4],
    /// Face edge line thickness in pixels
    pub edge_thickness: f32,
    /// Hover outline color (RGBA)
    pub highlight_color: [f32; 4],
    /// Committed selection outline color (RGBA)
    pub selection_color: [f32; 4],
    /// Color of the outline parts hidden behind other geometry (RGBA)
    pub hidden_line_color: [f32; 4],
    /// Outline line thickness in pixels
    pub line_thickness: f32,
    /// Depth bias keeping face edges in front of their face
    pub edge_depth_bias: f32,
    /// Depth bias keeping the outline in front of face edges
    pub outline_depth_bias: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::dark()
    }
}

impl OverlayConfig {
    /// Create dark theme overlay config
    pub fn dark() -> Self {
        Self {
            edge_color: [0.05, 0.05, 0.05, 1.0],
            edge_thickness: 1.0,
            highlight_color: [1.0, 0.85, 0.2, 1.0],
            selection_color: [1.0, 0.0, 0.0, 1.0],
            hidden_line_color: [0.6, 0.3, 0.3, 0.5],
            line_thickness: 2.0,
            edge_depth_bias: 0.001,
            outline_depth_bias: 0.002,
        }
    }

    /// Create light theme overlay config
    pub fn light() -> Self {
        Self {
            edge_color: [0.0, 0.0, 0.0, 1.0],
            highlight_color: [1.0, 0.6, 0.0, 1.0],
            hidden_line_color: [0.8, 0.5, 0.5, 0.5],
            ..Self::dark()
        }
    }

    /// Outline color for a highlight or selection material
    pub fn outline_color(&self, selected: bool) -> [f32; 4] {
        if selected {
            self.selection_color
        } else {
            self.highlight_color
        }
    }

    /// How face edge wireframes are drawn
    pub fn edge_style(&self) -> LineStyle {
        LineStyle {
            color: self.edge_color,
            hidden_color: None,
            thickness: self.edge_thickness,
            depth_bias: self.edge_depth_bias,
        }
    }

    /// How the highlight or selection outline is drawn
    pub fn outline_style(&self, selected: bool) -> LineStyle {
        LineStyle {
            color: self.outline_color(selected),
            hidden_color: Some(self.hidden_line_color),
            thickness: self.line_thickness,
            depth_bias: self.outline_depth_bias,
        }
    }
}

/// Resolved drawing parameters for a line primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Line color (RGBA)
    pub color: [f32; 4],
    /// Color for the parts hidden behind geometry; `None` hides them
    pub hidden_color: Option<[f32; 4]>,
    /// Line thickness in pixels
    pub thickness: f32,
    /// Depth bias toward the camera
    pub depth_bias: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        OverlayConfig::default().edge_style()
    }
}

/// Camera framing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraConfig {
    /// Field of view in degrees, used when zooming to a selected object
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { fov_degrees: 40.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_default() {
        let config = BuildConfig::default();
        assert_eq!(config.default_color, [0.5, 0.5, 0.5, 1.0]);
        assert!(config.generate_edges);
    }

    #[test]
    fn test_overlay_bias_ordering() {
        for config in [OverlayConfig::dark(), OverlayConfig::light()] {
            assert!(config.outline_depth_bias > config.edge_depth_bias);
        }
    }

    #[test]
    fn test_line_styles() {
        let config = OverlayConfig::light();

        let edge = config.edge_style();
        assert_eq!(edge.color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(edge.hidden_color, None);
        assert_eq!(edge.depth_bias, config.edge_depth_bias);

        let selected = config.outline_style(true);
        assert_eq!(selected.color, config.selection_color);
        assert_eq!(selected.hidden_color, Some(config.hidden_line_color));
        assert_eq!(selected.thickness, config.line_thickness);
        assert_eq!(config.outline_style(false).color, [1.0, 0.6, 0.0, 1.0]);
    }
}
