use serde_json::{Map, Value};

use foundation::math::GeoPoint;

/// Public world-countries GeoJSON the map is drawn from by default.
pub const DEFAULT_WORLD_GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/holtzy/D3-graph-gallery/master/DATA/world.geojson";

pub type Ring = Vec<GeoPoint>;
/// Exterior ring first, then holes.
pub type Polygon = Vec<Ring>;

/// One land feature (usually a country) as a set of polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct LandFeature {
    pub id: Option<String>,
    pub name: Option<String>,
    pub polygons: Vec<Polygon>,
}

/// Immutable basemap geometry. Loaded once, then shared read-only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorldGeometry {
    pub features: Vec<LandFeature>,
    /// Features dropped because their geometry was absent or not polygonal.
    pub skipped: usize,
}

#[derive(Debug)]
pub enum GeometryError {
    /// The payload could not be obtained (network or filesystem).
    Unavailable(String),
    Json(String),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::Unavailable(e) => write!(f, "world geometry unavailable: {e}"),
            GeometryError::Json(e) => write!(f, "JSON parse error: {e}"),
            GeometryError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            GeometryError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

impl WorldGeometry {
    pub fn from_geojson_str(payload: &str) -> Result<Self, GeometryError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| GeometryError::Json(e.to_string()))?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_slice(payload: &[u8]) -> Result<Self, GeometryError> {
        let value: Value =
            serde_json::from_slice(payload).map_err(|e| GeometryError::Json(e.to_string()))?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, GeometryError> {
        let obj = value
            .as_object()
            .ok_or(GeometryError::NotAFeatureCollection)?;
        if obj.get("type").and_then(|v| v.as_str()) != Some("FeatureCollection") {
            return Err(GeometryError::NotAFeatureCollection);
        }
        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(GeometryError::NotAFeatureCollection)?;

        let mut out = WorldGeometry::default();
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val
                .as_object()
                .ok_or_else(|| GeometryError::InvalidFeature {
                    index,
                    reason: "feature must be an object".to_string(),
                })?;
            let geometry = match feat_obj.get("geometry") {
                None | Some(Value::Null) => None,
                Some(g) => parse_polygons(g)
                    .map_err(|reason| GeometryError::InvalidFeature { index, reason })?,
            };
            let Some(polygons) = geometry else {
                out.skipped += 1;
                continue;
            };
            out.features.push(LandFeature {
                id: feature_id(feat_obj),
                name: feature_name(feat_obj),
                polygons,
            });
        }
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.features
            .iter()
            .flat_map(|f| f.polygons.iter())
            .flat_map(|p| p.iter())
            .map(|r| r.len())
            .sum()
    }
}

fn feature_id(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn feature_name(obj: &Map<String, Value>) -> Option<String> {
    obj.get("properties")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .map(str::to_string)
}

/// `Ok(None)` for well-formed geometry that is not polygonal.
fn parse_polygons(value: &Value) -> Result<Option<Vec<Polygon>>, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;
    let coords = || {
        obj.get("coordinates")
            .ok_or("geometry missing coordinates".to_string())
    };
    match ty {
        "Polygon" => Ok(Some(vec![parse_polygon(coords()?)?])),
        "MultiPolygon" => {
            let polys = coords()?
                .as_array()
                .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
            let mut out = Vec::with_capacity(polys.len());
            for poly in polys {
                out.push(parse_polygon(poly)?);
            }
            Ok(Some(out))
        }
        _ => Ok(None),
    }
}

fn parse_polygon(coords: &Value) -> Result<Polygon, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        let points = ring
            .as_array()
            .ok_or("ring must be an array of positions".to_string())?;
        let mut r = Vec::with_capacity(points.len());
        for p in points {
            r.push(parse_position(p)?);
        }
        out.push(r);
    }
    Ok(out)
}

fn parse_position(value: &Value) -> Result<GeoPoint, String> {
    let arr = value
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("position lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("position lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}
