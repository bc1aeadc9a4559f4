//! Built-in datasets, base layers and legend for the Northern Territory
//! survey map. Used whenever the config file does not supply its own.

use super::{DatasetConfig, TileLayerConfig};
use crate::domain::{
    HighlightStyle, Legend, LegendEntry, MarkerStyle, PathStyle, PopupRow, PopupTemplate,
};
use crate::geometry::{AnchorStrategy, MarkerVisibility};

const ESRI_ATTRIBUTION: &str = "© Esri & contributors";

pub fn tile_layers() -> Vec<TileLayerConfig> {
    vec![
        TileLayerConfig {
            name: "World Imagery".to_string(),
            url_template:
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
                    .to_string(),
            attribution: ESRI_ATTRIBUTION.to_string(),
        },
        TileLayerConfig {
            name: "World Reference Overlay".to_string(),
            url_template:
                "https://server.arcgisonline.com/ArcGIS/rest/services/Reference/World_Reference_Overlay/MapServer/tile/{z}/{y}/{x}"
                    .to_string(),
            attribution: ESRI_ATTRIBUTION.to_string(),
        },
    ]
}

/// Desktop studies: dotted yellow outline, soft yellow fill
pub fn desktop_studies() -> DatasetConfig {
    DatasetConfig {
        name: "Desktop Studies".to_string(),
        source: "NT_DTR.geojson".to_string(),
        anchor: AnchorStrategy::TopLeft,
        style: PathStyle {
            stroke_color: "#FFCC00".to_string(),
            fill_color: "#FFFF66".to_string(),
            weight: 2.0,
            opacity: 0.9,
            fill_opacity: 0.2,
            dash_pattern: Some("3, 7".to_string()),
        },
        highlight: HighlightStyle::default(),
        marker: MarkerStyle::with_color("#FFD700"),
        visibility: MarkerVisibility::default(),
        popup: PopupTemplate {
            background: "#e3f2fd".to_string(),
            accent: "#1976D2".to_string(),
            title_field: "Project Name".to_string(),
            rows: vec![
                PopupRow::new("📌", "Project No", "Project No"),
                PopupRow::new("📅", "Report Date", "Report Date"),
                PopupRow::new("🏗", "Contractor", "Contractor"),
            ],
        },
        label_field: "Project Name".to_string(),
    }
}

/// Field work: solid red outline, translucent red fill
///
/// Markers are labelled by `Clearance_Area_Name` rather than `Project Name`,
/// which this dataset does not have.
pub fn field_work() -> DatasetConfig {
    DatasetConfig {
        name: "Field Work".to_string(),
        source: "NT_CC.geojson".to_string(),
        anchor: AnchorStrategy::TopLeft,
        style: PathStyle {
            stroke_color: "#FF0000".to_string(),
            fill_color: "rgba(255, 0, 0, 0.3)".to_string(),
            weight: 3.0,
            opacity: 1.0,
            fill_opacity: 0.3,
            dash_pattern: Some("0".to_string()),
        },
        highlight: HighlightStyle::default(),
        marker: MarkerStyle::with_color("#FF0000"),
        visibility: MarkerVisibility::default(),
        popup: PopupTemplate {
            background: "#ffebee".to_string(),
            accent: "#D32F2F".to_string(),
            title_field: "Clearance_Area_Name".to_string(),
            rows: vec![
                PopupRow::new("📌", "Project No", "Certificate_Number"),
                PopupRow::new("📅", "Report Date", "Clearance_Date"),
                PopupRow::new("🏗", "Contractor", "Survey_equipment_and_systems_used"),
            ],
        },
        label_field: "Clearance_Area_Name".to_string(),
    }
}

pub fn datasets() -> Vec<DatasetConfig> {
    vec![desktop_studies(), field_work()]
}

pub fn legend() -> Legend {
    Legend {
        title: "Project Types".to_string(),
        position: "bottomright".to_string(),
        groups: vec![
            vec![
                LegendEntry::new("#FFFF66", "UXO Survey"),
                LegendEntry::new("#ffcc66", "Environmental Assessment"),
                LegendEntry::new("#ff6666", "Other Projects"),
            ],
            vec![
                LegendEntry::new("#FF0000", "Field Work (Red)"),
                LegendEntry::new("#0066CC", "Desktop Studies"),
            ],
        ],
    }
}
