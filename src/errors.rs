use std::error::Error;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
  InvalidPath(String),
  InvalidSpeed(f64),
  InvalidProbeDistance(f64),
}

impl Display for TrackError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TrackError::InvalidPath(msg) => write!(f, "invalid path: {msg}"),
      TrackError::InvalidSpeed(speed) => {
        write!(f, "invalid speed {speed}, speed must be a positive number")
      }
      TrackError::InvalidProbeDistance(distance) => {
        write!(f, "invalid probe distance {distance}, must be a positive number of km")
      }
    }
  }
}
impl Error for TrackError {}

#[derive(Debug)]
pub struct RenderError(pub String);

impl Display for RenderError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "RenderError: {}", self.0)
  }
}
impl Error for RenderError {}

impl From<String> for RenderError {
  fn from(value: String) -> Self {
    RenderError(value)
  }
}

impl From<&str> for RenderError {
  fn from(value: &str) -> Self {
    RenderError(value.to_owned())
  }
}
