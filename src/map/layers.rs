use geo::{LineString, MultiPolygon, Polygon};

use super::events::{Interactive, MapEvent};
use crate::domain::{Feature, HighlightStyle, MarkerStyle, PathStyle};
use crate::geometry::{GeometryError, LatLon, MarkerVisibility, ring_from_positions};

/// A styled polygon (or multipolygon) feature with its popup
#[derive(Debug, Clone)]
pub struct PolygonLayer {
    pub dataset: String,
    pub shape: MultiPolygon<f64>,
    pub popup: String,
    base_style: PathStyle,
    hover_style: PathStyle,
    hovered: bool,
}

impl PolygonLayer {
    pub fn new(
        dataset: &str,
        shape: MultiPolygon<f64>,
        style: &PathStyle,
        highlight: &HighlightStyle,
        popup: String,
    ) -> Self {
        Self {
            dataset: dataset.to_string(),
            shape,
            popup,
            base_style: style.clone(),
            hover_style: highlight.apply(style),
            hovered: false,
        }
    }

    /// Style currently drawn
    pub fn style(&self) -> &PathStyle {
        if self.hovered {
            &self.hover_style
        } else {
            &self.base_style
        }
    }

    pub fn base_style(&self) -> &PathStyle {
        &self.base_style
    }

    pub fn hover_style(&self) -> &PathStyle {
        &self.hover_style
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Rings as `[lat, lon]` arrays, nested polygon → ring → point
    pub fn latlngs(&self) -> Vec<Vec<Vec<[f64; 2]>>> {
        self.shape
            .iter()
            .map(|polygon| {
                std::iter::once(polygon.exterior())
                    .chain(polygon.interiors())
                    .map(|ring| ring.coords().map(|c| [c.y, c.x]).collect())
                    .collect()
            })
            .collect()
    }
}

impl Interactive for PolygonLayer {
    fn handle(&mut self, event: &MapEvent) -> bool {
        let hovered = match event {
            MapEvent::HoverEnter(_) => true,
            MapEvent::HoverExit(_) => false,
            MapEvent::ZoomEnd(_) => return false,
        };
        let changed = self.hovered != hovered;
        self.hovered = hovered;
        changed
    }
}

/// Circle marker placed on a polygon's anchor point
#[derive(Debug, Clone)]
pub struct AnchorMarker {
    pub dataset: String,
    pub position: LatLon,
    pub style: MarkerStyle,
    pub visibility: MarkerVisibility,
    pub popup: String,
    visible: bool,
}

impl AnchorMarker {
    /// Markers start out visible, as if just added to the map.
    pub fn new(
        dataset: &str,
        position: LatLon,
        style: &MarkerStyle,
        visibility: MarkerVisibility,
        popup: String,
    ) -> Self {
        Self {
            dataset: dataset.to_string(),
            position,
            style: style.clone(),
            visibility,
            popup,
            visible: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Interactive for AnchorMarker {
    fn handle(&mut self, event: &MapEvent) -> bool {
        let MapEvent::ZoomEnd(zoom) = event else {
            return false;
        };
        let visible = self.visibility.should_show(*zoom);
        let changed = self.visible != visible;
        self.visible = visible;
        changed
    }
}

/// Build the drawable shape of a Polygon or MultiPolygon feature.
///
/// Every ring must be well formed, every polygon needs a non-empty outer
/// ring, and there must be at least one polygon.
pub fn feature_shape(feature: &Feature) -> Result<MultiPolygon<f64>, GeometryError> {
    let parts = feature.polygons()?;
    if parts.is_empty() {
        return Err(GeometryError::EmptyRing);
    }

    let mut polygons = Vec::with_capacity(parts.len());
    for rings in parts {
        let (outer, holes) = rings.split_first().ok_or(GeometryError::EmptyRing)?;
        let exterior = ring_from_positions(outer)?;
        if exterior.is_empty() {
            return Err(GeometryError::EmptyRing);
        }
        let interiors = holes
            .iter()
            .map(|hole| ring_from_positions(hole).map(LineString::new))
            .collect::<Result<Vec<_>, _>>()?;

        polygons.push(Polygon::new(LineString::new(exterior), interiors));
    }

    Ok(MultiPolygon::new(polygons))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::events::LayerId;

    fn feature(geometry: serde_json::Value) -> Feature {
        serde_json::from_value(serde_json::json!({
            "type": "Feature",
            "properties": {},
            "geometry": geometry
        }))
        .unwrap()
    }

    fn style() -> PathStyle {
        PathStyle {
            stroke_color: "#FF0000".to_string(),
            fill_color: "rgba(255, 0, 0, 0.3)".to_string(),
            weight: 3.0,
            opacity: 1.0,
            fill_opacity: 0.3,
            dash_pattern: Some("0".to_string()),
        }
    }

    #[test]
    fn test_hover_restyles_and_restores() {
        let shape = feature_shape(&feature(serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [0, 1], [1, 1], [0, 0]]]
        })))
        .unwrap();
        let mut layer = PolygonLayer::new(
            "Field Work",
            shape,
            &style(),
            &HighlightStyle::default(),
            String::new(),
        );
        let id = LayerId::Polygon(0);

        assert_eq!(layer.style(), &style());
        assert!(layer.handle(&MapEvent::HoverEnter(id)));
        assert_eq!(layer.style().stroke_color, "#FFD700");
        assert_eq!(layer.style().fill_opacity, 0.7);
        assert!(!layer.handle(&MapEvent::HoverEnter(id)));
        assert!(!layer.handle(&MapEvent::ZoomEnd(3.0)));
        assert!(layer.handle(&MapEvent::HoverExit(id)));
        assert_eq!(layer.style(), &style());
    }

    #[test]
    fn test_marker_toggles_on_zoom() {
        let mut marker = AnchorMarker::new(
            "Field Work",
            LatLon::new(-12.0, 131.0),
            &MarkerStyle::with_color("#FF0000"),
            MarkerVisibility::default(),
            String::new(),
        );

        assert!(marker.is_visible());
        assert!(!marker.handle(&MapEvent::ZoomEnd(12.0)));
        assert!(marker.handle(&MapEvent::ZoomEnd(13.0)));
        assert!(!marker.is_visible());
        assert!(!marker.handle(&MapEvent::HoverEnter(LayerId::Marker(0))));
        assert!(marker.handle(&MapEvent::ZoomEnd(4.0)));
        assert!(marker.is_visible());
    }

    #[test]
    fn test_feature_shape_with_hole_and_latlngs() {
        let f = feature(serde_json::json!({
            "type": "Polygon",
            "coordinates": [
                [[0, 0], [0, 10], [10, 10], [10, 0], [0, 0]],
                [[2, 2], [2, 3], [3, 3], [2, 2]]
            ]
        }));
        let shape = feature_shape(&f).unwrap();
        assert_eq!(shape.0.len(), 1);
        assert_eq!(shape.0[0].interiors().len(), 1);

        let layer = PolygonLayer::new(
            "x",
            shape,
            &style(),
            &HighlightStyle::default(),
            String::new(),
        );
        let latlngs = layer.latlngs();
        assert_eq!(latlngs.len(), 1);
        assert_eq!(latlngs[0].len(), 2);
        assert_eq!(latlngs[0][0][1], [10.0, 0.0]);
    }

    #[test]
    fn test_feature_shape_rejects_bad_rings() {
        let empty = feature(serde_json::json!({"type": "Polygon", "coordinates": [[]]}));
        assert_eq!(feature_shape(&empty), Err(GeometryError::EmptyRing));

        let no_rings = feature(serde_json::json!({"type": "Polygon", "coordinates": []}));
        assert_eq!(feature_shape(&no_rings), Err(GeometryError::EmptyRing));

        let short = feature(serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [1]]]
        }));
        assert_eq!(
            feature_shape(&short),
            Err(GeometryError::MalformedPosition { index: 1 })
        );

        let null_member = feature(serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [0, 1], [null, 1], [0, 0]]]
        }));
        assert_eq!(
            feature_shape(&null_member),
            Err(GeometryError::MalformedPosition { index: 2 })
        );

        let one_level_short = feature(serde_json::json!({
            "type": "Polygon",
            "coordinates": [[0, 0], [0, 1], [1, 1]]
        }));
        assert_eq!(
            feature_shape(&one_level_short),
            Err(GeometryError::MalformedPosition { index: 0 })
        );

        let flat = feature(serde_json::json!({"type": "Polygon", "coordinates": [0, 0]}));
        assert_eq!(feature_shape(&flat), Err(GeometryError::MalformedCoordinates));
    }

    #[test]
    fn test_empty_multipolygon_rejected() {
        let empty = feature(serde_json::json!({"type": "MultiPolygon", "coordinates": []}));
        assert_eq!(feature_shape(&empty), Err(GeometryError::EmptyRing));

        let hollow = feature(serde_json::json!({"type": "MultiPolygon", "coordinates": [[]]}));
        assert_eq!(feature_shape(&hollow), Err(GeometryError::EmptyRing));
    }
}
