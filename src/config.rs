use crate::path::HeadingMode;
use duration_str::deserialize_duration;
use log::LevelFilter;
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrackOptions {
  /// kilometers per second
  pub speed: f64,
  pub auto_play: bool,
  pub rotation: bool,
  /// degrees added to the heading handed to the renderer
  pub rotation_offset: f64,
  #[serde(deserialize_with = "deserialize_duration")]
  pub max_delta: Duration,
  pub heading: HeadingMode,
  /// kilometers ahead of the marker used by the probe heading mode
  pub probe_distance: f64,
}

impl Default for TrackOptions {
  fn default() -> Self {
    Self {
      speed: 0.1,
      auto_play: true,
      rotation: true,
      rotation_offset: 0.0,
      max_delta: Duration::from_millis(50),
      heading: HeadingMode::Segment,
      probe_distance: 0.001,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Log {
  pub level: LevelFilter,
}

impl Default for Log {
  fn default() -> Self {
    Self {
      level: LevelFilter::Info,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Frame {
  #[serde(deserialize_with = "deserialize_duration")]
  pub interval: Duration,
  /// log every n-th position update, 0 disables position logging
  pub log_every: usize,
}

impl Default for Frame {
  fn default() -> Self {
    Self {
      interval: Duration::from_millis(16),
      log_every: 30,
    }
  }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
  pub log: Log,
  pub frame: Frame,
  pub track: TrackOptions,
}

pub fn parse_config(raw: &str) -> Result<Config, toml::de::Error> {
  toml::from_str(raw)
}

pub fn read_config(filename: Option<&str>) -> Config {
  let mut filenames = vec!["./trackplay.toml", "/etc/trackplay.toml"];
  if let Some(filename) = filename {
    filenames.insert(0, filename);
  }

  for fname in filenames {
    let path = Path::new(fname);
    println!("Trying config file {}...", fname);
    if path.is_file() {
      let config_raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
          println!("Error reading config file {}: {}", fname, err);
          continue;
        }
      };
      match parse_config(&config_raw) {
        Ok(config) => return config,
        Err(err) => {
          println!("Error parsing config file {}: {}", fname, err);
          continue;
        }
      }
    }
    println!("Config file {} does not exist", fname);
  }
  println!("No config files can be read, using default settings");
  Default::default()
}
