use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::TileLayerConfig;
use crate::domain::{MarkerStyle, PathStyle, escape_html};
use crate::geometry::MarkerVisibility;
use crate::map::MapView;

const LEAFLET_VERSION: &str = "1.9.4";

#[derive(Debug, Clone)]
pub struct PageOptions {
    pub title: String,
    /// Zoom to the loaded data instead of the configured view
    pub fit_bounds: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "Survey Map".to_string(),
            fit_bounds: false,
        }
    }
}

#[derive(Serialize)]
struct Scene<'a> {
    center: [f64; 2],
    zoom: f64,
    bounds: Option<[[f64; 2]; 2]>,
    tiles: &'a [TileLayerConfig],
    polygons: Vec<ScenePolygon<'a>>,
    markers: Vec<SceneMarker<'a>>,
    legend: Option<SceneLegend>,
}

#[derive(Serialize)]
struct ScenePolygon<'a> {
    latlngs: Vec<Vec<Vec<[f64; 2]>>>,
    style: &'a PathStyle,
    hover: &'a PathStyle,
    popup: &'a str,
}

#[derive(Serialize)]
struct SceneMarker<'a> {
    position: [f64; 2],
    style: &'a MarkerStyle,
    visibility: MarkerVisibility,
    popup: &'a str,
}

#[derive(Serialize)]
struct SceneLegend {
    position: String,
    html: String,
}

fn scene<'a>(map: &'a MapView, options: &PageOptions) -> Scene<'a> {
    let bounds = if options.fit_bounds {
        map.data_bounds()
            .map(|r| [[r.min().y, r.min().x], [r.max().y, r.max().x]])
    } else {
        None
    };

    Scene {
        center: map.center().to_array(),
        zoom: map.zoom(),
        bounds,
        tiles: map.tile_layers(),
        polygons: map
            .polygons()
            .iter()
            .map(|layer| ScenePolygon {
                latlngs: layer.latlngs(),
                style: layer.base_style(),
                hover: layer.hover_style(),
                popup: &layer.popup,
            })
            .collect(),
        markers: map
            .markers()
            .iter()
            .map(|marker| SceneMarker {
                position: marker.position.to_array(),
                style: &marker.style,
                visibility: marker.visibility,
                popup: &marker.popup,
            })
            .collect(),
        legend: map.legend().map(|legend| SceneLegend {
            position: legend.position.clone(),
            html: legend.render(),
        }),
    }
}

// Mirrors the in-memory behaviour: hover swaps to the highlight style and
// back, markers show while zoom <= min_zoom.
const SCRIPT: &str = r#"
const map = L.map('map').setView(scene.center, scene.zoom);
scene.tiles.forEach(t => L.tileLayer(t.url_template, { attribution: t.attribution }).addTo(map));

const pathOptions = s => ({
  color: s.stroke_color,
  fillColor: s.fill_color,
  weight: s.weight,
  opacity: s.opacity,
  fillOpacity: s.fill_opacity,
  dashArray: s.dash_pattern
});

scene.polygons.forEach(p => {
  const layer = L.polygon(p.latlngs, pathOptions(p.style)).addTo(map);
  layer.bindPopup(p.popup);
  layer.on('mouseover', () => layer.setStyle(pathOptions(p.hover)));
  layer.on('mouseout', () => layer.setStyle(pathOptions(p.style)));
});

const markers = scene.markers.map(m => {
  const marker = L.circleMarker(m.position, {
    radius: m.style.radius,
    color: m.style.color,
    fillColor: m.style.color,
    weight: m.style.weight,
    opacity: m.style.opacity,
    fillOpacity: m.style.fill_opacity
  }).addTo(map);
  marker.bindPopup(m.popup);
  return { marker, minZoom: m.visibility.min_zoom };
});

function updateMarkers() {
  const zoom = map.getZoom();
  markers.forEach(({ marker, minZoom }) => {
    if (zoom <= minZoom) {
      marker.addTo(map);
    } else {
      marker.removeFrom(map);
    }
  });
}
map.on('zoomend', updateMarkers);

if (scene.bounds) {
  map.fitBounds(scene.bounds);
}
updateMarkers();

if (scene.legend) {
  const legend = L.control({ position: scene.legend.position });
  legend.onAdd = function () {
    const div = L.DomUtil.create('div', 'legend');
    div.innerHTML = scene.legend.html;
    return div;
  };
  legend.addTo(map);
}
"#;

const STYLE: &str = "html, body, #map { height: 100%; margin: 0; }\n\
.legend { background: white; padding: 8px; border-radius: 8px; \
box-shadow: 2px 2px 8px rgba(0, 0, 0, 0.2); }";

/// Render a standalone Leaflet page for the map
pub fn render_page(map: &MapView, options: &PageOptions) -> Result<String> {
    let scene_json =
        serde_json::to_string(&scene(map, options)).context("Failed to serialize map scene")?;
    // Keep "</script>" inside popup text from closing the script element
    let scene_json = scene_json.replace("</", "<\\/");

    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@{v}/dist/leaflet.css\">\n\
         <script src=\"https://unpkg.com/leaflet@{v}/dist/leaflet.js\"></script>\n\
         <style>\n{style}\n</style>\n</head>\n<body>\n<div id=\"map\"></div>\n\
         <script>\nconst scene = {scene};\n{script}</script>\n</body>\n</html>\n",
        title = escape_html(&options.title),
        v = LEAFLET_VERSION,
        style = STYLE,
        scene = scene_json,
        script = SCRIPT,
    ))
}

/// Write the page to `path`
pub fn write_page(path: &Path, map: &MapView, options: &PageOptions) -> Result<()> {
    let html = render_page(map, options)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(html.as_bytes())?;
    writer.flush()?;

    Ok(())
}
