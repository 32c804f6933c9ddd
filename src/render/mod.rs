/// Renderer collaborators
/// A renderer receives every recomputed marker position together with the
/// heading to rotate to, or None when rotation is disabled
pub mod css;

use crate::{errors::RenderError, types::GeoPoint};
use log::info;

pub trait Renderer {
  fn update(&mut self, point: GeoPoint, heading: Option<f64>) -> Result<(), RenderError>;
}

impl<F> Renderer for F
where
  F: FnMut(GeoPoint, Option<f64>) -> Result<(), RenderError>,
{
  fn update(&mut self, point: GeoPoint, heading: Option<f64>) -> Result<(), RenderError> {
    self(point, heading)
  }
}

/// Writes positions to the log, every n-th update
#[derive(Debug)]
pub struct LogRenderer {
  name: String,
  every: usize,
  count: usize,
}

impl LogRenderer {
  pub fn new(name: &str, every: usize) -> Self {
    Self {
      name: name.to_owned(),
      every,
      count: 0,
    }
  }

  pub fn count(&self) -> usize {
    self.count
  }
}

impl Renderer for LogRenderer {
  fn update(&mut self, point: GeoPoint, heading: Option<f64>) -> Result<(), RenderError> {
    if self.every > 0 && self.count % self.every == 0 {
      match heading {
        Some(hdg) => info!(
          "{} at {:.6},{:.6} heading {:.1}",
          self.name, point.lat, point.lng, hdg
        ),
        None => info!("{} at {:.6},{:.6}", self.name, point.lat, point.lng),
      }
    }
    self.count += 1;
    Ok(())
  }
}
