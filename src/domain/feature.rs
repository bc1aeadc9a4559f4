use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geometry::GeometryError;

/// A GeoJSON FeatureCollection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// A single GeoJSON feature
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
}

/// Geometry kinds the renderer draws. Everything else is carried as `Other`.
///
/// Coordinates stay raw JSON so one malformed feature cannot fail the whole
/// collection; they are checked per feature when the shape is built.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon {
        #[serde(default)]
        coordinates: Value,
    },
    MultiPolygon {
        #[serde(default)]
        coordinates: Value,
    },
    #[serde(other)]
    Other,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<Map<String, Value>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

fn json_array(value: &Value) -> Result<&[Value], GeometryError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or(GeometryError::MalformedCoordinates)
}

fn polygon_rings(value: &Value) -> Result<Vec<&[Value]>, GeometryError> {
    json_array(value)?.iter().map(json_array).collect()
}

impl Feature {
    /// Outer ring positions of a `Polygon` geometry. Only these features get
    /// markers.
    pub fn outer_ring(&self) -> Option<&[Value]> {
        match &self.geometry {
            Some(Geometry::Polygon { coordinates }) => {
                coordinates.as_array()?.first()?.as_array().map(Vec::as_slice)
            }
            _ => None,
        }
    }

    /// All polygons of the feature, each as a list of rings of unparsed
    /// positions.
    pub fn polygons(&self) -> Result<Vec<Vec<&[Value]>>, GeometryError> {
        match &self.geometry {
            Some(Geometry::Polygon { coordinates }) => Ok(vec![polygon_rings(coordinates)?]),
            Some(Geometry::MultiPolygon { coordinates }) => {
                json_array(coordinates)?.iter().map(polygon_rings).collect()
            }
            _ => Ok(Vec::new()),
        }
    }

    pub fn is_polygonal(&self) -> bool {
        matches!(
            self.geometry,
            Some(Geometry::Polygon { .. } | Geometry::MultiPolygon { .. })
        )
    }

    /// Display text for a property; missing and `null` values are empty.
    pub fn property_text(&self, field: &str) -> String {
        match self.properties.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}
