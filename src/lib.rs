//! surveymap - Render interactive web maps of survey and clearance area GeoJSON datasets

pub mod api;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod map;
pub mod output;

pub use api::{FetchError, Fetcher};
pub use geometry::{AnchorStrategy, GeometryError, LatLon, centroid, should_show, top_left_corner};
pub use map::{DatasetReport, MapView, populate};
