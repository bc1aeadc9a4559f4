use serde::{Deserialize, Serialize};

/// Stroke and fill attributes of a polygon layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub stroke_color: String,
    pub fill_color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
    /// SVG dash array, e.g. `"3, 7"`. `None` or `"0"` draws a solid line.
    #[serde(default)]
    pub dash_pattern: Option<String>,
}

fn default_highlight_color() -> String {
    "#FFD700".to_string()
}
fn default_highlight_weight() -> f64 {
    3.0
}
fn default_highlight_fill_opacity() -> f64 {
    0.7
}

/// Attributes overridden while the pointer is over a polygon.
/// Everything not listed here keeps the base style's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightStyle {
    #[serde(default = "default_highlight_color")]
    pub stroke_color: String,
    #[serde(default = "default_highlight_weight")]
    pub weight: f64,
    #[serde(default = "default_highlight_fill_opacity")]
    pub fill_opacity: f64,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            stroke_color: default_highlight_color(),
            weight: default_highlight_weight(),
            fill_opacity: default_highlight_fill_opacity(),
        }
    }
}

impl HighlightStyle {
    pub fn apply(&self, base: &PathStyle) -> PathStyle {
        PathStyle {
            stroke_color: self.stroke_color.clone(),
            weight: self.weight,
            fill_opacity: self.fill_opacity,
            ..base.clone()
        }
    }
}

fn default_marker_radius() -> f64 {
    8.0
}
fn default_marker_weight() -> f64 {
    3.0
}
fn default_marker_opacity() -> f64 {
    1.0
}
fn default_marker_fill_opacity() -> f64 {
    0.7
}

/// Circle marker drawn at a polygon's anchor. Border and fill share one colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: String,
    #[serde(default = "default_marker_radius")]
    pub radius: f64,
    #[serde(default = "default_marker_weight")]
    pub weight: f64,
    #[serde(default = "default_marker_opacity")]
    pub opacity: f64,
    #[serde(default = "default_marker_fill_opacity")]
    pub fill_opacity: f64,
}

impl MarkerStyle {
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            radius: default_marker_radius(),
            weight: default_marker_weight(),
            opacity: default_marker_opacity(),
            fill_opacity: default_marker_fill_opacity(),
        }
    }
}
