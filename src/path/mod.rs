/// Path geometry
/// Immutable polyline with haversine segment lengths in kilometers
/// and the distance → (position, heading) resolution over it
use crate::{
  errors::TrackError,
  types::{normalize_heading, GeoPoint},
};
use geo::{HaversineBearing, HaversineDistance};
use geo_types::Point;
use serde::Deserialize;

const METERS_IN_KM: f64 = 1000.0;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeadingMode {
  /// constant bearing of the segment being traveled
  #[default]
  Segment,
  /// bearing towards a point slightly ahead on the path
  Probe,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
  pub point: GeoPoint,
  pub heading: f64,
  pub segment: usize,
}

/// Great-circle distance in kilometers
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
  let pa: Point = a.into();
  let pb: Point = b.into();
  pa.haversine_distance(&pb) / METERS_IN_KM
}

/// Initial bearing from `a` to `b`, degrees clockwise from north in 0..360
pub fn bearing(a: GeoPoint, b: GeoPoint) -> f64 {
  let pa: Point = a.into();
  let pb: Point = b.into();
  normalize_heading(pa.haversine_bearing(pb))
}

#[derive(Debug, Clone)]
pub struct PathModel {
  points: Vec<GeoPoint>,
  lengths: Vec<f64>,
  headings: Vec<f64>,
  // cumulative[i] is the distance from the start to points[i]
  cumulative: Vec<f64>,
}

impl PathModel {
  pub fn new(points: Vec<GeoPoint>) -> Result<Self, TrackError> {
    if points.len() < 2 {
      return Err(TrackError::InvalidPath(format!(
        "path must have at least two points, got {}",
        points.len()
      )));
    }

    let mut lengths = Vec::with_capacity(points.len() - 1);
    let mut headings = Vec::with_capacity(points.len() - 1);
    let mut cumulative = Vec::with_capacity(points.len());
    let mut total = 0.0;
    cumulative.push(total);

    for pair in points.windows(2) {
      let len = distance(pair[0], pair[1]);
      lengths.push(len);
      headings.push(bearing(pair[0], pair[1]));
      total += len;
      cumulative.push(total);
    }

    Ok(Self {
      points,
      lengths,
      headings,
      cumulative,
    })
  }

  pub fn points(&self) -> &[GeoPoint] {
    &self.points
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  pub fn segment_count(&self) -> usize {
    self.lengths.len()
  }

  pub fn segment_lengths(&self) -> &[f64] {
    &self.lengths
  }

  pub fn segment_heading(&self, idx: usize) -> Option<f64> {
    self.headings.get(idx).copied()
  }

  pub fn initial_heading(&self) -> f64 {
    self.headings[0]
  }

  pub fn total_length(&self) -> f64 {
    self.cumulative[self.cumulative.len() - 1]
  }

  fn clamp_distance(&self, distance: f64) -> f64 {
    if distance.is_nan() {
      0.0
    } else {
      distance.clamp(0.0, self.total_length())
    }
  }

  /// Index of the segment containing `distance`, which must be clamped already
  fn segment_at(&self, distance: f64) -> usize {
    let last = self.segment_count() - 1;
    if distance >= self.total_length() {
      return last;
    }
    // first segment whose end lies at or beyond the distance
    self.cumulative[1..]
      .partition_point(|&end| end < distance)
      .min(last)
  }

  fn point_at(&self, distance: f64, segment: usize) -> GeoPoint {
    if distance >= self.total_length() {
      return self.points[self.points.len() - 1];
    }
    let start = self.points[segment];
    let len = self.lengths[segment];
    if len <= 0.0 {
      return start;
    }
    let t = ((distance - self.cumulative[segment]) / len).clamp(0.0, 1.0);
    start.lerp(&self.points[segment + 1], t)
  }

  /// Position and segment heading at `distance` km from the start.
  /// Out of range distances are clamped into 0..=total_length.
  pub fn resolve(&self, distance: f64) -> Resolved {
    let distance = self.clamp_distance(distance);
    let segment = self.segment_at(distance);
    Resolved {
      point: self.point_at(distance, segment),
      heading: self.headings[segment],
      segment,
    }
  }

  /// Like `resolve` but the heading points towards the position `epsilon` km
  /// further along the path. At the very end the probe looks backwards.
  /// A non-positive epsilon keeps the segment heading.
  pub fn resolve_probe(&self, distance: f64, epsilon: f64) -> Resolved {
    let mut res = self.resolve(distance);
    if !(epsilon.is_finite() && epsilon > 0.0) {
      return res;
    }
    let distance = self.clamp_distance(distance);
    let total = self.total_length();

    let (from, to) = if distance + epsilon <= total {
      (res.point, self.resolve(distance + epsilon).point)
    } else {
      (self.resolve(distance - epsilon).point, res.point)
    };
    if from != to {
      res.heading = bearing(from, to);
    }
    res
  }

  pub fn resolve_with(&self, distance: f64, mode: HeadingMode, epsilon: f64) -> Resolved {
    match mode {
      HeadingMode::Segment => self.resolve(distance),
      HeadingMode::Probe => self.resolve_probe(distance, epsilon),
    }
  }
}
