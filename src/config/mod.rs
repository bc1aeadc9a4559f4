use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::domain::{HighlightStyle, Legend, MarkerStyle, PathStyle, PopupTemplate};
use crate::geometry::{AnchorStrategy, LatLon, MarkerVisibility};

pub mod presets;

fn default_center() -> LatLon {
    // Centered on Australia
    LatLon::new(-25.0, 133.0)
}
fn default_zoom() -> f64 {
    5.0
}
fn default_true() -> bool {
    true
}
fn default_label_field() -> String {
    "Project Name".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    concat!("surveymap/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Initial viewport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_center")]
    pub center: LatLon,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: default_center(),
            zoom: default_zoom(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// XYZ tile service drawn beneath the data layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerConfig {
    pub name: String,
    pub url_template: String,
    #[serde(default)]
    pub attribution: String,
}

/// One GeoJSON source with the styling and popups used to draw it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub name: String,
    /// File path (relative to the data directory) or `http(s)://` URL
    pub source: String,
    #[serde(default)]
    pub anchor: AnchorStrategy,
    pub style: PathStyle,
    #[serde(default)]
    pub highlight: HighlightStyle,
    pub marker: MarkerStyle,
    #[serde(default)]
    pub visibility: MarkerVisibility,
    pub popup: PopupTemplate,
    /// Property shown in bold in the marker popup
    #[serde(default = "default_label_field")]
    pub label_field: String,
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub fit_bounds: bool,
    #[serde(default = "default_true")]
    pub show_legend: bool,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub tile_layers: Option<Vec<TileLayerConfig>>,
    #[serde(default)]
    pub datasets: Option<Vec<DatasetConfig>>,
    #[serde(default)]
    pub legend: Option<Legend>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            output: None,
            data_dir: None,
            verbose: false,
            fit_bounds: false,
            show_legend: true,
            view: ViewConfig::default(),
            fetch: FetchConfig::default(),
            tile_layers: None,
            datasets: None,
            legend: None,
        }
    }
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        debug!(path = %path.display(), "loaded config file");
                        return Some(config);
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to parse config file");
                    }
                }
            }
        }
        None
    }

    pub fn tile_layers(&self) -> Vec<TileLayerConfig> {
        self.tile_layers.clone().unwrap_or_else(presets::tile_layers)
    }

    pub fn datasets(&self) -> Vec<DatasetConfig> {
        self.datasets.clone().unwrap_or_else(presets::datasets)
    }

    pub fn legend(&self) -> Option<Legend> {
        if !self.show_legend {
            return None;
        }
        Some(self.legend.clone().unwrap_or_else(presets::legend))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("surveymap.toml"));
    paths.push(PathBuf::from(".surveymap.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("surveymap").join("config.toml"));
        paths.push(config_dir.join("surveymap.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".surveymap.toml"));
        paths.push(home.join(".config").join("surveymap").join("config.toml"));
    }

    paths
}
