/// Playback state machine
/// Owns the traveled distance and the frame loop, everything it wants the
/// outside world to know about is queued as a Notice and drained by the owner
use crate::{
  config::TrackOptions,
  errors::TrackError,
  path::{HeadingMode, PathModel, Resolved},
  scheduler::{FrameScheduler, FrameToken},
};
use log::{debug, trace};
use std::{fmt::Display, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
  Idle,
  Playing,
  Paused,
  Finished,
}

impl Display for PlaybackState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      PlaybackState::Idle => write!(f, "idle"),
      PlaybackState::Playing => write!(f, "playing"),
      PlaybackState::Paused => write!(f, "paused"),
      PlaybackState::Finished => write!(f, "finished"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackEvent {
  BeforePlay,
  Play,
  Progress { percent: f64 },
  Pause,
  Reset,
  Seek { percent: f64 },
  Finish,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notice {
  Moved(Resolved),
  Event(TrackEvent),
}

// relative slack for the finish check, summed deltas land a few ulps short
const FINISH_TOLERANCE: f64 = 1e-9;

pub fn validate_speed(speed: f64) -> Result<f64, TrackError> {
  if speed.is_finite() && speed > 0.0 {
    Ok(speed)
  } else {
    Err(TrackError::InvalidSpeed(speed))
  }
}

pub fn validate_probe_distance(distance: f64) -> Result<f64, TrackError> {
  if distance.is_finite() && distance > 0.0 {
    Ok(distance)
  } else {
    Err(TrackError::InvalidProbeDistance(distance))
  }
}

#[derive(Debug)]
pub struct PlaybackController<S: FrameScheduler> {
  path: Arc<PathModel>,
  scheduler: S,

  traveled: f64,
  speed: f64,
  max_delta: f64,
  auto_play: bool,
  heading_mode: HeadingMode,
  probe_distance: f64,

  state: PlaybackState,
  current: Resolved,
  pending: Option<FrameToken>,
  last_frame: Option<f64>,

  notices: Vec<Notice>,
}

impl<S: FrameScheduler> PlaybackController<S> {
  pub fn new(path: Arc<PathModel>, scheduler: S, opts: &TrackOptions) -> Result<Self, TrackError> {
    let speed = validate_speed(opts.speed)?;
    let probe_distance = validate_probe_distance(opts.probe_distance)?;
    let current = path.resolve_with(0.0, opts.heading, probe_distance);
    Ok(Self {
      path,
      scheduler,
      traveled: 0.0,
      speed,
      max_delta: opts.max_delta.as_secs_f64(),
      auto_play: opts.auto_play,
      heading_mode: opts.heading,
      probe_distance,
      state: PlaybackState::Idle,
      current,
      pending: None,
      last_frame: None,
      notices: vec![Notice::Moved(current)],
    })
  }

  pub fn path(&self) -> &PathModel {
    &self.path
  }

  pub fn scheduler(&self) -> &S {
    &self.scheduler
  }

  pub fn scheduler_mut(&mut self) -> &mut S {
    &mut self.scheduler
  }

  pub fn state(&self) -> PlaybackState {
    self.state
  }

  pub fn is_playing(&self) -> bool {
    self.state == PlaybackState::Playing
  }

  pub fn traveled(&self) -> f64 {
    self.traveled
  }

  pub fn total_distance(&self) -> f64 {
    self.path.total_length()
  }

  pub fn progress(&self) -> f64 {
    let total = self.total_distance();
    if total > 0.0 {
      self.traveled / total
    } else {
      1.0
    }
  }

  pub fn speed(&self) -> f64 {
    self.speed
  }

  pub fn auto_play(&self) -> bool {
    self.auto_play
  }

  pub fn heading(&self) -> f64 {
    self.current.heading
  }

  pub fn position(&self) -> Resolved {
    self.current
  }

  pub fn pending_frame(&self) -> Option<FrameToken> {
    self.pending
  }

  pub fn drain_notices(&mut self) -> std::vec::Drain<'_, Notice> {
    self.notices.drain(..)
  }

  fn recompute(&mut self) {
    self.current = self
      .path
      .resolve_with(self.traveled, self.heading_mode, self.probe_distance);
    self.notices.push(Notice::Moved(self.current));
  }

  fn emit(&mut self, event: TrackEvent) {
    self.notices.push(Notice::Event(event));
  }

  fn schedule(&mut self) {
    self.cancel_pending();
    self.pending = Some(self.scheduler.request_frame());
  }

  fn cancel_pending(&mut self) {
    if let Some(token) = self.pending.take() {
      self.scheduler.cancel_frame(token);
    }
  }

  pub fn play(&mut self) {
    if self.state == PlaybackState::Playing {
      return;
    }
    if self.state == PlaybackState::Finished && self.traveled >= self.total_distance() {
      // replaying a finished track starts over
      self.traveled = 0.0;
      self.recompute();
    }
    self.emit(TrackEvent::BeforePlay);
    self.state = PlaybackState::Playing;
    self.last_frame = Some(self.scheduler.now());
    self.schedule();
    debug!("playback started at {:.3}km", self.traveled);
    self.emit(TrackEvent::Play);
  }

  pub fn pause(&mut self) {
    if self.state != PlaybackState::Playing {
      return;
    }
    self.state = PlaybackState::Paused;
    self.cancel_pending();
    self.last_frame = None;
    debug!("playback paused at {:.3}km", self.traveled);
    self.emit(TrackEvent::Pause);
  }

  pub fn reset(&mut self) {
    self.cancel_pending();
    self.traveled = 0.0;
    self.state = PlaybackState::Idle;
    self.last_frame = None;
    self.recompute();
    self.emit(TrackEvent::Reset);
    if self.auto_play {
      self.play();
    }
  }

  pub fn seek(&mut self, percent: f64) {
    let percent = if percent.is_nan() {
      0.0
    } else {
      percent.clamp(0.0, 1.0)
    };
    let total = self.total_distance();
    self.traveled = if percent >= 1.0 { total } else { percent * total };
    self.recompute();
    self.emit(TrackEvent::Seek { percent });
  }

  pub fn set_speed(&mut self, speed: f64) -> Result<(), TrackError> {
    self.speed = validate_speed(speed)?;
    Ok(())
  }

  /// Advances playback by `delta` seconds, bounded by the max delta
  pub fn on_tick(&mut self, delta: f64) {
    if self.state != PlaybackState::Playing {
      return;
    }
    let delta = if delta.is_finite() {
      delta.clamp(0.0, self.max_delta)
    } else {
      0.0
    };

    let total = self.total_distance();
    self.traveled += delta * self.speed;
    trace!("tick {delta}s, traveled {:.6}km of {:.6}km", self.traveled, total);

    if self.traveled >= total - total * FINISH_TOLERANCE {
      self.traveled = total;
      self.recompute();
      self.state = PlaybackState::Finished;
      self.cancel_pending();
      self.last_frame = None;
      debug!("playback finished, {total:.3}km traveled");
      self.emit(TrackEvent::Finish);
    } else {
      self.recompute();
      let percent = self.progress();
      self.emit(TrackEvent::Progress { percent });
      self.schedule();
    }
  }

  /// Frame delivery from the host scheduler. Frames other than the pending
  /// one were cancelled or superseded and are dropped.
  pub fn on_frame(&mut self, token: FrameToken, timestamp: f64) {
    if self.pending != Some(token) {
      debug!("dropping stale frame {:?}", token);
      return;
    }
    self.pending = None;
    let delta = match self.last_frame {
      Some(prev) => (timestamp - prev) / 1000.0,
      None => 0.0,
    };
    self.last_frame = Some(timestamp);
    self.on_tick(delta);
  }
}

impl<S: FrameScheduler> Drop for PlaybackController<S> {
  fn drop(&mut self) {
    self.cancel_pending();
  }
}
