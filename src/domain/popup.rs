use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::Feature;

/// One labelled line of a popup card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupRow {
    #[serde(default)]
    pub icon: String,
    pub label: String,
    pub field: String,
}

impl PopupRow {
    pub fn new(icon: &str, label: &str, field: &str) -> Self {
        Self {
            icon: icon.to_string(),
            label: label.to_string(),
            field: field.to_string(),
        }
    }
}

/// Popup card bound to every polygon of a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupTemplate {
    pub background: String,
    pub accent: String,
    pub title_field: String,
    #[serde(default)]
    pub rows: Vec<PopupRow>,
}

impl PopupTemplate {
    /// Render the card for one feature. Property values are HTML escaped.
    pub fn render(&self, feature: &Feature) -> String {
        let mut html = String::new();

        // Writing into a String cannot fail.
        let _ = write!(
            html,
            "<div style=\"background: {}; padding: 15px; border-radius: 8px; \
             box-shadow: 2px 2px 8px rgba(0, 0, 0, 0.3); font-family: 'Helvetica Neue', sans-serif;\">",
            escape_html(&self.background)
        );
        let _ = write!(
            html,
            "<h4 style=\"color: {}; text-align: center;\">{}</h4>",
            escape_html(&self.accent),
            escape_html(&feature.property_text(&self.title_field))
        );
        for row in &self.rows {
            let label = if row.icon.is_empty() {
                escape_html(&row.label)
            } else {
                format!("{} {}", escape_html(&row.icon), escape_html(&row.label))
            };
            let _ = write!(
                html,
                "<p style=\"color: #333; margin: 5px 0; font-size: 14px;\"><b>{}:</b> {}</p>",
                label,
                escape_html(&feature.property_text(&row.field))
            );
        }
        html.push_str("</div>");

        html
    }
}

/// Short marker popup: the label field in bold
pub fn marker_label(feature: &Feature, label_field: &str) -> String {
    format!("<b>{}</b>", escape_html(&feature.property_text(label_field)))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
