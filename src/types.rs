use geo_types::{Coord, Point as GeoTypesPoint};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
  pub lat: f64,
  pub lng: f64,
}

impl From<GeoPoint> for GeoTypesPoint {
  fn from(val: GeoPoint) -> Self {
    Self(Coord {
      x: val.lng,
      y: val.lat,
    })
  }
}

impl From<GeoTypesPoint> for GeoPoint {
  fn from(val: GeoTypesPoint) -> Self {
    Self {
      lat: val.y(),
      lng: val.x(),
    }
  }
}

impl GeoPoint {
  pub fn new(lat: f64, lng: f64) -> Self {
    Self { lat, lng }
  }

  pub fn is_finite(&self) -> bool {
    self.lat.is_finite() && self.lng.is_finite()
  }

  /// Linear interpolation in coordinate space, `t` in 0..=1
  pub fn lerp(&self, other: &GeoPoint, t: f64) -> Self {
    Self {
      lat: self.lat + (other.lat - self.lat) * t,
      lng: self.lng + (other.lng - self.lng) * t,
    }
  }
}

/// Normalizes any angle in degrees into 0..360
pub fn normalize_heading(deg: f64) -> f64 {
  let h = deg.rem_euclid(360.0);
  // rem_euclid may round up to exactly 360 for tiny negative inputs
  if h >= 360.0 {
    0.0
  } else {
    h
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;

  #[test]
  fn test_lerp() {
    let a = GeoPoint::new(0.0, 0.0);
    let b = GeoPoint::new(2.0, 4.0);
    assert_eq!(a.lerp(&b, 0.5), GeoPoint::new(1.0, 2.0));
    assert_eq!(a.lerp(&b, 0.0), a);
    assert_eq!(a.lerp(&b, 1.0), b);
  }

  #[test]
  fn test_normalize_heading() {
    assert_eq!(normalize_heading(-90.0), 270.0);
    assert_eq!(normalize_heading(360.0), 0.0);
    assert_eq!(normalize_heading(450.0), 90.0);
    assert_eq!(normalize_heading(-1e-18), 0.0);
  }

  #[test]
  fn test_geo_types_conversion() {
    let p = GeoPoint::new(10.0, 20.0);
    let gp: GeoTypesPoint = p.into();
    assert_eq!(gp.x(), 20.0);
    assert_eq!(gp.y(), 10.0);
    assert_eq!(GeoPoint::from(gp), p);
  }
}
