use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::popup::escape_html;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub color: String,
    pub label: String,
}

impl LegendEntry {
    pub fn new(color: &str, label: &str) -> Self {
        Self {
            color: color.to_string(),
            label: label.to_string(),
        }
    }
}

fn default_position() -> String {
    "bottomright".to_string()
}

/// Static legend overlay. Groups are separated by a horizontal rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    #[serde(default = "default_position")]
    pub position: String,
    #[serde(default)]
    pub groups: Vec<Vec<LegendEntry>>,
}

impl Legend {
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Inner HTML of the legend box
    pub fn render(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<h4 style=\"margin-bottom: 5px;\">{}</h4>",
            escape_html(&self.title)
        );
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                html.push_str("<hr>");
            }
            for entry in group {
                let _ = write!(
                    html,
                    "<i style=\"background: {}; width: 12px; height: 12px; display: inline-block; \
                     margin-right: 5px;\"></i> {}<br>",
                    escape_html(&entry.color),
                    escape_html(&entry.label)
                );
            }
        }
        html
    }
}
