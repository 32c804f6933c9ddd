use super::Renderer;
use crate::{errors::RenderError, types::GeoPoint};
use lazy_static::lazy_static;
use regex::Regex;
use std::{f64::consts::PI, str::FromStr};

const TILE_SIZE: f64 = 256.0;
const MAX_LATITUDE: f64 = 85.0511287798;

lazy_static! {
  static ref WHITESPACE: Regex = Regex::from_str(r"\s+").unwrap();
  static ref ROTATE: Regex = Regex::from_str(r"rotate\([^)]*\)").unwrap();
  static ref TRANSLATE: Regex = Regex::from_str(r"translate3d\([^)]*\)").unwrap();
}

fn squash(transform: &str) -> String {
  WHITESPACE.replace_all(transform, " ").trim().to_owned()
}

pub fn strip_rotation(transform: &str) -> String {
  squash(&ROTATE.replace_all(transform, ""))
}

/// Replaces any rotation in a CSS transform with `rotate(<angle>deg)`,
/// keeping whatever else the transform holds
pub fn compose_rotation(transform: &str, angle: f64) -> String {
  let rest = strip_rotation(transform);
  if rest.is_empty() {
    format!("rotate({angle}deg)")
  } else {
    format!("{rest} rotate({angle}deg)")
  }
}

/// Web mercator pixel coordinates at the given zoom level
pub fn project(point: GeoPoint, zoom: f64) -> Option<(f64, f64)> {
  if point.lat.abs() > MAX_LATITUDE {
    return None;
  }
  let scale = TILE_SIZE * 2f64.powf(zoom);
  let lat = point.lat.to_radians();
  let x = (point.lng + 180.0) / 360.0 * scale;
  let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * scale;
  if x.is_finite() && y.is_finite() {
    Some((x, y))
  } else {
    None
  }
}

/// Marker element state driven through a CSS transform. The translation is
/// owned by the marker, the rotation is composed on top of it.
#[derive(Debug, Clone)]
pub struct CssMarker {
  zoom: f64,
  transform: String,
}

impl CssMarker {
  pub fn new(zoom: f64, transform: &str) -> Self {
    Self {
      zoom,
      transform: transform.to_owned(),
    }
  }

  pub fn transform(&self) -> &str {
    &self.transform
  }
}

impl Renderer for CssMarker {
  fn update(&mut self, point: GeoPoint, heading: Option<f64>) -> Result<(), RenderError> {
    let (x, y) = project(point, self.zoom)
      .ok_or_else(|| RenderError(format!("{point:?} can't be projected")))?;
    let rest = TRANSLATE.replace_all(&self.transform, "");
    let positioned = squash(&format!("translate3d({x:.0}px, {y:.0}px, 0px) {rest}"));
    self.transform = match heading {
      Some(angle) => compose_rotation(&positioned, angle),
      None => strip_rotation(&positioned),
    };
    Ok(())
  }
}
