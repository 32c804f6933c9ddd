use clap::Parser;
use log::{info, warn};
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode};
use trackplay::{
  config::read_config,
  render::LogRenderer,
  scheduler::{FrameScheduler, MonotonicScheduler},
  track::TrackEntity,
  util::seconds_since,
  PathInput,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
struct Args {
  #[arg(short)]
  config: Option<String>,
  /// speed in km/s, overrides the configured one
  #[arg(short, long)]
  speed: Option<f64>,
  /// start at this fraction of the path
  #[arg(long, default_value_t = 0.0)]
  seek: f64,
  /// GeoJSON file or a JSON array of [lat, lng] pairs
  path: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let args = Args::parse();
  let config = read_config(args.config.as_deref());

  TermLogger::init(
    config.log.level,
    LogConfig::default(),
    TerminalMode::Stdout,
    ColorChoice::Auto,
  )?;

  info!("starting trackplay version {}", VERSION);
  let raw = std::fs::read_to_string(&args.path)?;
  let input: PathInput = raw.parse()?;

  let mut opts = config.track.clone();
  if let Some(speed) = args.speed {
    opts.speed = speed;
  }

  let renderer = LogRenderer::new(&args.path, config.frame.log_every);
  let mut entity = TrackEntity::new(input, opts, MonotonicScheduler::new(), renderer)?;
  info!(
    "{}: {} points, {:.3}km at {}km/s",
    args.path,
    entity.path().len(),
    entity.total_distance(),
    entity.speed()
  );

  let t = chrono::Utc::now();
  entity.seek(args.seek).add().play();

  let mut ticker = tokio::time::interval(config.frame.interval);
  while let Some(token) = entity.scheduler_mut().take() {
    tokio::select! {
      _ = ticker.tick() => {}
      _ = tokio::signal::ctrl_c() => {
        warn!("interrupted at {:.3}km", entity.traveled());
        entity.remove();
        break;
      }
    }
    let ts = entity.scheduler().now();
    entity.on_frame(token, ts);
  }

  info!(
    "{:.3}km of {:.3}km traveled in {}s",
    entity.traveled(),
    entity.total_distance(),
    seconds_since(t)
  );
  Ok(())
}
