pub mod feature;
pub mod legend;
pub mod popup;
pub mod style;

pub use feature::{Feature, FeatureCollection, Geometry};
pub use legend::{Legend, LegendEntry};
pub use popup::{PopupRow, PopupTemplate, escape_html, marker_label};
pub use style::{HighlightStyle, MarkerStyle, PathStyle};
