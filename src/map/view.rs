use geo::{BoundingRect, Coord, Rect};
use tracing::debug;

use super::events::{EventDispatcher, EventKind, Interactive, LayerId, MapEvent};
use super::layers::{AnchorMarker, PolygonLayer};
use crate::config::{TileLayerConfig, ViewConfig};
use crate::domain::Legend;
use crate::geometry::LatLon;

/// The map being assembled: viewport, base tiles, data layers and legend.
///
/// All interaction goes through [`MapView::dispatch`], so hover and zoom
/// behaviour can be exercised without a rendering surface.
#[derive(Debug)]
pub struct MapView {
    center: LatLon,
    zoom: f64,
    tile_layers: Vec<TileLayerConfig>,
    polygons: Vec<PolygonLayer>,
    markers: Vec<AnchorMarker>,
    legend: Option<Legend>,
    dispatcher: EventDispatcher,
}

impl MapView {
    pub fn new(view: &ViewConfig, tile_layers: Vec<TileLayerConfig>) -> Self {
        Self {
            center: view.center,
            zoom: view.zoom,
            tile_layers,
            polygons: Vec::new(),
            markers: Vec::new(),
            legend: None,
            dispatcher: EventDispatcher::new(),
        }
    }

    pub fn center(&self) -> LatLon {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn tile_layers(&self) -> &[TileLayerConfig] {
        &self.tile_layers
    }

    pub fn polygons(&self) -> &[PolygonLayer] {
        &self.polygons
    }

    pub fn markers(&self) -> &[AnchorMarker] {
        &self.markers
    }

    pub fn visible_markers(&self) -> impl Iterator<Item = &AnchorMarker> {
        self.markers.iter().filter(|m| m.is_visible())
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub fn set_legend(&mut self, legend: Option<Legend>) {
        self.legend = legend;
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn add_polygon(&mut self, layer: PolygonLayer) -> LayerId {
        let id = LayerId::Polygon(self.polygons.len());
        self.polygons.push(layer);
        self.dispatcher.subscribe(id, EventKind::HoverEnter);
        self.dispatcher.subscribe(id, EventKind::HoverExit);
        id
    }

    pub fn add_marker(&mut self, marker: AnchorMarker) -> LayerId {
        let id = LayerId::Marker(self.markers.len());
        self.markers.push(marker);
        self.dispatcher.subscribe(id, EventKind::VisibilityCheck);
        id
    }

    /// Deliver an event to its subscribers. Returns how many layers changed.
    pub fn dispatch(&mut self, event: MapEvent) -> usize {
        let mut changed = 0;
        for id in self.dispatcher.recipients(&event) {
            let layer: Option<&mut dyn Interactive> = match id {
                LayerId::Polygon(i) => self.polygons.get_mut(i).map(|l| l as &mut dyn Interactive),
                LayerId::Marker(i) => self.markers.get_mut(i).map(|m| m as &mut dyn Interactive),
            };
            if let Some(layer) = layer
                && layer.handle(&event)
            {
                changed += 1;
            }
        }
        changed
    }

    pub fn hover_enter(&mut self, layer: LayerId) -> usize {
        self.dispatch(MapEvent::HoverEnter(layer))
    }

    pub fn hover_exit(&mut self, layer: LayerId) -> usize {
        self.dispatch(MapEvent::HoverExit(layer))
    }

    /// Zoom the viewport and run the marker visibility pass
    pub fn set_zoom(&mut self, zoom: f64) -> usize {
        self.zoom = zoom;
        let changed = self.dispatch(MapEvent::ZoomEnd(zoom));
        debug!(zoom, changed, "zoom changed");
        changed
    }

    /// Re-evaluate marker visibility at the current zoom
    pub fn refresh_markers(&mut self) -> usize {
        self.dispatch(MapEvent::ZoomEnd(self.zoom))
    }

    /// Bounding box of every polygon layer, in lon/lat
    pub fn data_bounds(&self) -> Option<Rect<f64>> {
        self.polygons
            .iter()
            .filter_map(|layer| layer.shape.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    Coord {
                        x: a.min().x.min(b.min().x),
                        y: a.min().y.min(b.min().y),
                    },
                    Coord {
                        x: a.max().x.max(b.max().x),
                        y: a.max().y.max(b.max().y),
                    },
                )
            })
    }
}
