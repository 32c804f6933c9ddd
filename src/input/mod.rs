/// Path input normalization
/// Turns coordinate lists and GeoJSON objects into the ordered points
/// a PathModel is built from
use crate::{errors::TrackError, path::PathModel, types::GeoPoint};
use geojson::{Feature, GeoJson, Geometry, Value};
use log::debug;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub enum PathInput {
  Points(Vec<GeoPoint>),
  /// (lat, lng) pairs
  LatLngs(Vec<(f64, f64)>),
  GeoJson(GeoJson),
}

impl From<Vec<GeoPoint>> for PathInput {
  fn from(value: Vec<GeoPoint>) -> Self {
    PathInput::Points(value)
  }
}

impl From<Vec<(f64, f64)>> for PathInput {
  fn from(value: Vec<(f64, f64)>) -> Self {
    PathInput::LatLngs(value)
  }
}

impl From<GeoJson> for PathInput {
  fn from(value: GeoJson) -> Self {
    PathInput::GeoJson(value)
  }
}

impl From<Geometry> for PathInput {
  fn from(value: Geometry) -> Self {
    PathInput::GeoJson(GeoJson::Geometry(value))
  }
}

impl FromStr for PathInput {
  type Err = TrackError;

  /// Accepts GeoJSON text or a bare JSON array of `[lat, lng]` pairs
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.parse::<GeoJson>() {
      Ok(geo) => Ok(PathInput::GeoJson(geo)),
      Err(geo_err) => {
        let pairs: Vec<(f64, f64)> = serde_json::from_str(s).map_err(|err| {
          TrackError::InvalidPath(format!(
            "input is neither geojson ({geo_err}) nor a list of lat/lng pairs ({err})"
          ))
        })?;
        Ok(PathInput::LatLngs(pairs))
      }
    }
  }
}

fn position_to_point(pos: &[f64]) -> Option<GeoPoint> {
  if pos.len() < 2 {
    return None;
  }
  // geojson positions are lng, lat
  let point = GeoPoint::new(pos[1], pos[0]);
  if point.is_finite() {
    Some(point)
  } else {
    None
  }
}

/// First path-shaped geometry, descending into geometry collections
fn find_line(geom: &Geometry) -> Option<&[Vec<f64>]> {
  match &geom.value {
    Value::LineString(line) => Some(line.as_slice()),
    Value::MultiLineString(lines) => lines.first().map(|line| line.as_slice()),
    Value::GeometryCollection(geoms) => geoms.iter().find_map(find_line),
    _ => None,
  }
}

fn find_feature_line(feat: &Feature) -> Option<&[Vec<f64>]> {
  feat.geometry.as_ref().and_then(find_line)
}

impl PathInput {
  /// Resolvable points of the input. Entries with non-finite coordinates
  /// or missing ordinates are skipped.
  pub fn points(&self) -> Result<Vec<GeoPoint>, TrackError> {
    let points: Vec<GeoPoint> = match self {
      PathInput::Points(points) => points.iter().copied().filter(GeoPoint::is_finite).collect(),
      PathInput::LatLngs(pairs) => pairs
        .iter()
        .map(|&(lat, lng)| GeoPoint::new(lat, lng))
        .filter(GeoPoint::is_finite)
        .collect(),
      PathInput::GeoJson(geo) => {
        let line = match geo {
          GeoJson::Geometry(geom) => find_line(geom),
          GeoJson::Feature(feat) => find_feature_line(feat),
          GeoJson::FeatureCollection(fc) => fc.features.iter().find_map(find_feature_line),
        };
        let line = line.ok_or_else(|| {
          TrackError::InvalidPath("no line geometry found in geojson input".to_owned())
        })?;
        line.iter().filter_map(|pos| position_to_point(pos)).collect()
      }
    };
    debug!("path input normalized to {} points", points.len());
    Ok(points)
  }

  pub fn into_path(self) -> Result<PathModel, TrackError> {
    PathModel::new(self.points()?)
  }
}
