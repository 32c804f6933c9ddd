pub mod config;
pub mod errors;
pub mod input;
pub mod path;
pub mod playback;
pub mod render;
pub mod scheduler;
pub mod track;
pub mod types;
pub mod util;

pub use self::{
  errors::TrackError,
  input::PathInput,
  path::PathModel,
  track::{TrackEntity, TrackEvent},
  types::GeoPoint,
};
