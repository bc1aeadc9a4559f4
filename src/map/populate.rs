use tracing::{error, info, warn};

use super::layers::{AnchorMarker, PolygonLayer, feature_shape};
use super::view::MapView;
use crate::api::Fetcher;
use crate::config::DatasetConfig;
use crate::domain::{FeatureCollection, marker_label};
use crate::geometry::ring_from_positions;

/// Outcome of loading one dataset onto the map
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetReport {
    pub name: String,
    pub polygons: usize,
    pub markers: usize,
    /// Polygonal features dropped because their rings were rejected
    pub skipped: usize,
    pub error: Option<String>,
}

impl DatasetReport {
    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            polygons: 0,
            markers: 0,
            skipped: 0,
            error: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.error.is_none()
    }
}

/// Fetch a dataset and add its layers to the map.
///
/// A failed fetch is logged and reported; the map keeps its base tiles and
/// any previously loaded datasets.
pub fn populate(map: &mut MapView, dataset: &DatasetConfig, fetcher: &Fetcher) -> DatasetReport {
    match fetcher.fetch(&dataset.source) {
        Ok(collection) => add_dataset(map, dataset, &collection),
        Err(e) => {
            error!(dataset = %dataset.name, error = %e, "error loading the GeoJSON file");
            DatasetReport {
                error: Some(e.to_string()),
                ..DatasetReport::empty(&dataset.name)
            }
        }
    }
}

/// Add one polygon layer per polygonal feature and one anchor marker per
/// `Polygon` feature.
pub fn add_dataset(
    map: &mut MapView,
    dataset: &DatasetConfig,
    collection: &FeatureCollection,
) -> DatasetReport {
    let mut report = DatasetReport::empty(&dataset.name);

    for (index, feature) in collection.features.iter().enumerate() {
        if !feature.is_polygonal() {
            continue;
        }

        let shape = match feature_shape(feature) {
            Ok(shape) => shape,
            Err(e) => {
                warn!(dataset = %dataset.name, feature = index, error = %e, "skipping feature");
                report.skipped += 1;
                continue;
            }
        };

        map.add_polygon(PolygonLayer::new(
            &dataset.name,
            shape,
            &dataset.style,
            &dataset.highlight,
            dataset.popup.render(feature),
        ));
        report.polygons += 1;

        let Some(outer) = feature.outer_ring() else {
            continue;
        };
        // feature_shape already validated this ring
        let anchor = ring_from_positions(outer).and_then(|ring| dataset.anchor.anchor(&ring));
        match anchor {
            Ok(position) => {
                map.add_marker(AnchorMarker::new(
                    &dataset.name,
                    position,
                    &dataset.marker,
                    dataset.visibility,
                    marker_label(feature, &dataset.label_field),
                ));
                report.markers += 1;
            }
            Err(e) => {
                warn!(dataset = %dataset.name, feature = index, error = %e, "no anchor for feature");
            }
        }
    }

    info!(
        dataset = %dataset.name,
        polygons = report.polygons,
        markers = report.markers,
        skipped = report.skipped,
        "dataset added"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FetchConfig, ViewConfig, presets};
    use crate::geometry::LatLon;
    use crate::map::LayerId;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Log sink shared between a test and its subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, logs.contents())
    }

    const TWO_AREAS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature",
             "properties": {"Project Name": "Berrimah", "Project No": "P-1"},
             "geometry": {"type": "Polygon", "coordinates": [[[130.9, -12.4], [131.0, -12.4], [131.0, -12.5], [130.9, -12.5], [130.9, -12.4]]]}},
            {"type": "Feature",
             "properties": {"Project Name": "Katherine", "Project No": "P-2"},
             "geometry": {"type": "Polygon", "coordinates": [[[132.2, -14.5], [132.3, -14.4], [132.4, -14.5], [132.2, -14.5]]]}}
        ]
    }"#;

    fn new_map() -> MapView {
        MapView::new(&ViewConfig::default(), presets::tile_layers())
    }

    fn dataset(source: &str) -> DatasetConfig {
        DatasetConfig {
            source: source.to_string(),
            ..presets::desktop_studies()
        }
    }

    #[test]
    fn test_populate_two_features() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("NT_DTR.geojson"), TWO_AREAS).unwrap();
        let fetcher = Fetcher::new(&FetchConfig::default(), dir.path()).unwrap();

        let mut map = new_map();
        let report = populate(&mut map, &dataset("NT_DTR.geojson"), &fetcher);
        map.refresh_markers();

        assert!(report.is_loaded());
        assert_eq!(report.polygons, 2);
        assert_eq!(report.markers, 2);
        assert_eq!(map.polygons().len(), 2);
        assert_eq!(map.markers().len(), 2);
        assert_eq!(map.visible_markers().count(), 2);
        assert_eq!(map.markers()[0].position, LatLon::new(-12.4, 130.9));
        assert_eq!(map.markers()[1].position, LatLon::new(-14.4, 132.3));
        assert_eq!(map.markers()[0].popup, "<b>Berrimah</b>");
        assert!(map.polygons()[1].popup.contains("Katherine"));
        assert_eq!(map.polygons()[0].style().dash_pattern.as_deref(), Some("3, 7"));
    }

    #[test]
    fn test_fetch_failure_keeps_base_tiles() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Fetcher::new(&FetchConfig::default(), dir.path()).unwrap();

        let mut map = new_map();
        let (report, logs) =
            with_captured_logs(|| populate(&mut map, &dataset("NT_DTR.geojson"), &fetcher));

        assert!(logs.contains("ERROR"));
        assert!(logs.contains("error loading the GeoJSON file"));
        assert!(logs.contains("Desktop Studies"));
        assert!(!report.is_loaded());
        assert!(report.error.as_deref().unwrap().contains("NT_DTR.geojson"));
        assert_eq!(report.markers, 0);
        assert!(map.markers().is_empty());
        assert!(map.polygons().is_empty());
        assert_eq!(map.tile_layers().len(), 2);
    }

    #[test]
    fn test_failure_does_not_affect_other_dataset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("NT_DTR.geojson"), TWO_AREAS).unwrap();
        std::fs::write(dir.path().join("NT_CC.geojson"), "<html>not found</html>").unwrap();
        let fetcher = Fetcher::new(&FetchConfig::default(), dir.path()).unwrap();

        let mut map = new_map();
        let ok = populate(&mut map, &dataset("NT_DTR.geojson"), &fetcher);
        let bad = populate(&mut map, &presets::field_work(), &fetcher);

        assert!(ok.is_loaded());
        assert!(!bad.is_loaded());
        assert_eq!(map.markers().len(), 2);
    }

    #[test]
    fn test_bad_coordinate_skips_only_its_feature() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("NT_DTR.geojson"),
            r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"Project Name": "Berrimah"},
                 "geometry": {"type": "Polygon", "coordinates": [[[130.9, -12.4], [131.0, -12.4], [131.0, -12.5], [130.9, -12.4]]]}},
                {"type": "Feature", "properties": {"Project Name": "Broken"},
                 "geometry": {"type": "Polygon", "coordinates": [[[null, 1], [2, 1], [2, 2], [null, 1]]]}},
                {"type": "Feature", "properties": {"Project Name": "Too flat"},
                 "geometry": {"type": "MultiPolygon", "coordinates": [[130.9, -12.4]]}}
            ]
        }"#,
        )
        .unwrap();
        let fetcher = Fetcher::new(&FetchConfig::default(), dir.path()).unwrap();

        let mut map = new_map();
        let (report, logs) =
            with_captured_logs(|| populate(&mut map, &dataset("NT_DTR.geojson"), &fetcher));

        assert!(report.is_loaded());
        assert_eq!(report.polygons, 1);
        assert_eq!(report.markers, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(map.markers()[0].popup, "<b>Berrimah</b>");
        assert!(logs.contains("skipping feature"));
    }

    #[test]
    fn test_mixed_geometries() {
        let collection: FeatureCollection = serde_json::from_str(
            r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"name": "point"},
                 "geometry": {"type": "Point", "coordinates": [1, 1]}},
                {"type": "Feature", "properties": {"name": "multi"},
                 "geometry": {"type": "MultiPolygon", "coordinates": [[[[0, 0], [0, 1], [1, 1], [0, 0]]]]}},
                {"type": "Feature", "properties": {"name": "broken"},
                 "geometry": {"type": "Polygon", "coordinates": [[]]}},
                {"type": "Feature", "properties": {"name": "centre"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [0, 2], [2, 2], [2, 0]]]}}
            ]
        }"#,
        )
        .unwrap();

        let config = DatasetConfig {
            anchor: crate::geometry::AnchorStrategy::Centroid,
            label_field: "name".to_string(),
            ..presets::field_work()
        };

        let mut map = new_map();
        let report = add_dataset(&mut map, &config, &collection);

        assert_eq!(report.polygons, 2);
        assert_eq!(report.markers, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(map.markers()[0].position, LatLon::new(1.0, 1.0));
        assert_eq!(map.markers()[0].popup, "<b>centre</b>");
    }

    #[test]
    fn test_loaded_layers_respond_to_events() {
        let collection: FeatureCollection = serde_json::from_str(TWO_AREAS).unwrap();
        let mut map = new_map();
        add_dataset(&mut map, &presets::desktop_studies(), &collection);

        assert_eq!(map.hover_enter(LayerId::Polygon(1)), 1);
        assert_eq!(map.polygons()[1].style().weight, 3.0);
        assert_eq!(map.set_zoom(14.0), 2);
        assert_eq!(map.visible_markers().count(), 0);
    }
}
