use serde::{Deserialize, Serialize};

fn default_min_zoom() -> f64 {
    12.0
}
fn default_max_zoom() -> f64 {
    25.0
}

/// Zoom window attached to a marker when it is created
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerVisibility {
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
}

impl Default for MarkerVisibility {
    fn default() -> Self {
        Self {
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
        }
    }
}

impl MarkerVisibility {
    pub fn should_show(&self, current_zoom: f64) -> bool {
        should_show(current_zoom, self.min_zoom, self.max_zoom)
    }
}

/// Whether a marker is displayed at `current_zoom`.
///
/// Markers show while zoomed out to `min_zoom` or further. `max_zoom` is
/// carried along but does not take part in the comparison.
pub fn should_show(current_zoom: f64, min_zoom: f64, _max_zoom: f64) -> bool {
    current_zoom <= min_zoom
}
