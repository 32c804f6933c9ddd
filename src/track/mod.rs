/// Animated track marker
/// Composes the path, the playback controller, an injected frame scheduler
/// and an injected renderer into the public control surface
pub mod hooks;

pub use self::hooks::{Hook, Hooks};
pub use crate::playback::{PlaybackState, TrackEvent};

use crate::{
  config::TrackOptions,
  errors::TrackError,
  input::PathInput,
  path::PathModel,
  playback::{Notice, PlaybackController},
  render::Renderer,
  scheduler::{FrameScheduler, FrameToken},
  types::{normalize_heading, GeoPoint},
};
use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

pub struct TrackEntity<S: FrameScheduler, R: Renderer> {
  id: Uuid,
  controller: PlaybackController<S>,
  renderer: R,
  rotation: bool,
  rotation_offset: f64,
  hooks: Hooks,
  subscribers: Vec<Hook>,
  added: bool,
}

impl<S: FrameScheduler, R: Renderer> TrackEntity<S, R> {
  pub fn new<I: Into<PathInput>>(
    input: I,
    options: TrackOptions,
    scheduler: S,
    renderer: R,
  ) -> Result<Self, TrackError> {
    let path = input.into().into_path()?;
    Self::with_path(Arc::new(path), options, scheduler, renderer)
  }

  pub fn with_path(
    path: Arc<PathModel>,
    options: TrackOptions,
    scheduler: S,
    renderer: R,
  ) -> Result<Self, TrackError> {
    let controller = PlaybackController::new(path, scheduler, &options)?;
    let mut entity = Self {
      id: Uuid::new_v4(),
      controller,
      renderer,
      rotation: options.rotation,
      rotation_offset: options.rotation_offset,
      hooks: Hooks::default(),
      subscribers: vec![],
      added: false,
    };
    debug!(
      "track {} created, {} points, {:.3}km",
      entity.id,
      entity.path().len(),
      entity.total_distance()
    );
    entity.flush();
    Ok(entity)
  }

  pub fn with_hooks(mut self, hooks: Hooks) -> Self {
    self.hooks = hooks;
    self
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn path(&self) -> &PathModel {
    self.controller.path()
  }

  pub fn scheduler(&self) -> &S {
    self.controller.scheduler()
  }

  pub fn scheduler_mut(&mut self) -> &mut S {
    self.controller.scheduler_mut()
  }

  pub fn renderer(&self) -> &R {
    &self.renderer
  }

  pub fn renderer_mut(&mut self) -> &mut R {
    &mut self.renderer
  }

  pub fn state(&self) -> PlaybackState {
    self.controller.state()
  }

  pub fn is_added(&self) -> bool {
    self.added
  }

  pub fn traveled(&self) -> f64 {
    self.controller.traveled()
  }

  pub fn total_distance(&self) -> f64 {
    self.controller.total_distance()
  }

  pub fn progress(&self) -> f64 {
    self.controller.progress()
  }

  pub fn speed(&self) -> f64 {
    self.controller.speed()
  }

  pub fn position(&self) -> GeoPoint {
    self.controller.position().point
  }

  /// Heading of travel, without the rotation offset
  pub fn heading(&self) -> f64 {
    self.controller.heading()
  }

  pub fn pending_frame(&self) -> Option<FrameToken> {
    self.controller.pending_frame()
  }

  pub fn subscribe<F>(&mut self, handler: F) -> &mut Self
  where
    F: FnMut(&TrackEvent) + 'static,
  {
    self.subscribers.push(Box::new(handler));
    self
  }

  /// Attaches the marker to its host, starting playback when auto play is on
  pub fn add(&mut self) -> &mut Self {
    if !self.added {
      self.added = true;
      info!("track {} added", self.id);
      if self.controller.auto_play() {
        self.play();
      }
    }
    self
  }

  /// Detaches the marker, stopping playback and dropping the pending frame
  pub fn remove(&mut self) -> &mut Self {
    self.pause();
    if self.added {
      self.added = false;
      info!("track {} removed", self.id);
    }
    self
  }

  pub fn play(&mut self) -> &mut Self {
    self.controller.play();
    self.flush();
    self
  }

  pub fn pause(&mut self) -> &mut Self {
    self.controller.pause();
    self.flush();
    self
  }

  pub fn reset(&mut self) -> &mut Self {
    self.controller.reset();
    self.flush();
    self
  }

  pub fn seek(&mut self, percent: f64) -> &mut Self {
    self.controller.seek(percent);
    self.flush();
    self
  }

  /// Non-positive speeds are rejected, the previous speed stays in effect
  pub fn set_speed(&mut self, speed: f64) -> &mut Self {
    if let Err(err) = self.controller.set_speed(speed) {
      warn!("track {}: {err}, keeping speed {}", self.id, self.controller.speed());
    }
    self
  }

  pub fn on_tick(&mut self, delta: f64) -> &mut Self {
    self.controller.on_tick(delta);
    self.flush();
    self
  }

  pub fn on_frame(&mut self, token: FrameToken, timestamp: f64) -> &mut Self {
    self.controller.on_frame(token, timestamp);
    self.flush();
    self
  }

  fn flush(&mut self) {
    let notices: Vec<Notice> = self.controller.drain_notices().collect();
    for notice in notices {
      match notice {
        Notice::Moved(res) => self.render(res.point, res.heading),
        Notice::Event(event) => self.dispatch(&event),
      }
    }
  }

  fn render(&mut self, point: GeoPoint, heading: f64) {
    let heading = if self.rotation {
      Some(normalize_heading(heading + self.rotation_offset))
    } else {
      None
    };
    if let Err(err) = self.renderer.update(point, heading) {
      warn!("track {}: failed to update marker: {err}", self.id);
    }
  }

  fn dispatch(&mut self, event: &TrackEvent) {
    if let TrackEvent::Finish = event {
      info!("track {} finished", self.id);
    }
    self.hooks.dispatch(event);
    for handler in self.subscribers.iter_mut() {
      handler(event);
    }
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;
  use crate::{errors::RenderError, scheduler::ManualScheduler};
  use std::{cell::RefCell, rc::Rc, time::Duration};

  type Updates = Rc<RefCell<Vec<(GeoPoint, Option<f64>)>>>;

  fn recorder(
    updates: &Updates,
  ) -> impl FnMut(GeoPoint, Option<f64>) -> Result<(), RenderError> {
    let updates = updates.clone();
    move |p, h| {
      updates.borrow_mut().push((p, h));
      Ok(())
    }
  }

  fn latlngs() -> Vec<(f64, f64)> {
    vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]
  }

  fn options() -> TrackOptions {
    TrackOptions {
      speed: 1.0,
      auto_play: false,
      ..Default::default()
    }
  }

  #[test]
  fn test_construction_renders_start() {
    let updates: Updates = Default::default();
    let entity =
      TrackEntity::new(latlngs(), options(), ManualScheduler::new(), recorder(&updates)).unwrap();
    assert_eq!(entity.state(), PlaybackState::Idle);
    assert_eq!(entity.position(), GeoPoint::new(0.0, 0.0));
    let updates = updates.borrow();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, GeoPoint::new(0.0, 0.0));
    assert!((updates[0].1.unwrap() - 90.0).abs() < 1e-6);
  }

  #[test]
  fn test_invalid_input() {
    let updates: Updates = Default::default();
    let res = TrackEntity::new(
      vec![(1.0, 1.0)],
      options(),
      ManualScheduler::new(),
      recorder(&updates),
    );
    assert!(matches!(res, Err(TrackError::InvalidPath(_))));
    assert!(updates.borrow().is_empty());

    let bad_speed = TrackOptions {
      speed: -1.0,
      ..options()
    };
    let res = TrackEntity::new(latlngs(), bad_speed, ManualScheduler::new(), recorder(&updates));
    assert!(matches!(res, Err(TrackError::InvalidSpeed(_))));
  }

  #[test]
  fn test_chaining() {
    let updates: Updates = Default::default();
    let mut entity =
      TrackEntity::new(latlngs(), options(), ManualScheduler::new(), recorder(&updates)).unwrap();
    entity.seek(0.5).set_speed(2.0).play().pause();
    assert_eq!(entity.state(), PlaybackState::Paused);
    assert_eq!(entity.speed(), 2.0);
    assert!((entity.progress() - 0.5).abs() < 1e-9);
    let traveled = entity.reset().traveled();
    assert_eq!(traveled, 0.0);
  }

  #[test]
  fn test_rotation_offset_and_disabled_rotation() {
    let updates: Updates = Default::default();
    let opts = TrackOptions {
      rotation_offset: -135.0,
      ..options()
    };
    TrackEntity::new(latlngs(), opts, ManualScheduler::new(), recorder(&updates)).unwrap();
    // 90 - 135 wraps around to 315
    assert!((updates.borrow()[0].1.unwrap() - 315.0).abs() < 1e-6);

    let updates: Updates = Default::default();
    let opts = TrackOptions {
      rotation: false,
      ..options()
    };
    let mut entity =
      TrackEntity::new(latlngs(), opts, ManualScheduler::new(), recorder(&updates)).unwrap();
    entity.seek(0.75);
    assert!(updates.borrow().iter().all(|(_, h)| h.is_none()));
    // heading is still tracked
    assert!(entity.heading().abs() < 1e-6);
  }

  #[test]
  fn test_events_reach_hooks_and_subscribers() {
    let log: Rc<RefCell<Vec<String>>> = Default::default();
    let hook_log = log.clone();
    let finish_log = log.clone();
    let hooks = Hooks::default()
      .on_before_play(move |_| hook_log.borrow_mut().push("hook:before_play".to_owned()))
      .on_finish(move |_| finish_log.borrow_mut().push("hook:finish".to_owned()));

    let mut entity = TrackEntity::new(
      latlngs(),
      TrackOptions {
        speed: 10_000.0,
        ..options()
      },
      ManualScheduler::new(),
      |_: GeoPoint, _: Option<f64>| -> Result<(), RenderError> { Ok(()) },
    )
    .unwrap()
    .with_hooks(hooks);

    let sub_log = log.clone();
    entity.subscribe(move |ev| sub_log.borrow_mut().push(format!("{ev:?}")));

    entity.play();
    entity.on_tick(0.05);
    entity.pause().reset();

    assert_eq!(
      *log.borrow(),
      vec![
        "hook:before_play",
        "BeforePlay",
        "Play",
        "hook:finish",
        "Finish",
        "Reset"
      ]
    );
  }

  #[test]
  fn test_renderer_failure_does_not_stop_playback() {
    let calls = Rc::new(RefCell::new(0));
    let counter = calls.clone();
    let failing = move |_: GeoPoint, _: Option<f64>| -> Result<(), RenderError> {
      *counter.borrow_mut() += 1;
      Err("element is gone".into())
    };
    let mut entity =
      TrackEntity::new(latlngs(), options(), ManualScheduler::new(), failing).unwrap();
    entity.play();
    entity.on_tick(0.05).on_tick(0.05);
    assert!((entity.traveled() - 0.1).abs() < 1e-9);
    assert_eq!(entity.state(), PlaybackState::Playing);
    assert!(entity.pending_frame().is_some());
    assert_eq!(*calls.borrow(), 3);
  }

  #[test]
  fn test_invalid_speed_is_ignored() {
    let updates: Updates = Default::default();
    let mut entity =
      TrackEntity::new(latlngs(), options(), ManualScheduler::new(), recorder(&updates)).unwrap();
    entity.set_speed(0.0).set_speed(-3.0);
    assert_eq!(entity.speed(), 1.0);
  }

  #[test]
  fn test_add_with_autoplay() {
    let updates: Updates = Default::default();
    let opts = TrackOptions {
      auto_play: true,
      ..options()
    };
    let mut entity =
      TrackEntity::new(latlngs(), opts, ManualScheduler::new(), recorder(&updates)).unwrap();
    assert_eq!(entity.state(), PlaybackState::Idle);
    entity.add();
    assert!(entity.is_added());
    assert_eq!(entity.state(), PlaybackState::Playing);
    entity.remove();
    assert!(!entity.is_added());
    assert_eq!(entity.state(), PlaybackState::Paused);
    assert_eq!(entity.scheduler().pending(), None);
  }

  #[test]
  fn test_drop_cancels_frame() {
    let shared = Rc::new(RefCell::new(ManualScheduler::new()));
    let updates: Updates = Default::default();
    let mut entity =
      TrackEntity::new(latlngs(), options(), shared.clone(), recorder(&updates)).unwrap();
    entity.play();
    assert!(shared.borrow().pending().is_some());
    drop(entity);
    assert_eq!(shared.borrow().pending(), None);
  }

  #[test]
  fn test_frame_loop_to_the_end() {
    let updates: Updates = Default::default();
    let opts = TrackOptions {
      speed: 50.0,
      max_delta: Duration::from_millis(100),
      ..options()
    };
    let mut entity =
      TrackEntity::new(latlngs(), opts, ManualScheduler::new(), recorder(&updates)).unwrap();
    let finished = Rc::new(RefCell::new(0));
    let counter = finished.clone();
    entity.subscribe(move |ev| {
      if *ev == TrackEvent::Finish {
        *counter.borrow_mut() += 1;
      }
    });

    entity.play();
    let mut frames = 0;
    while let Some(token) = entity.scheduler_mut().take() {
      let ts = entity.scheduler_mut().advance(16.0);
      entity.on_frame(token, ts);
      frames += 1;
      assert!(frames < 10_000);
    }
    assert_eq!(entity.state(), PlaybackState::Finished);
    assert_eq!(*finished.borrow(), 1);
    assert_eq!(entity.traveled(), entity.total_distance());
    let last = *updates.borrow().last().unwrap();
    assert_eq!(last.0, GeoPoint::new(1.0, 1.0));
    // one render at construction and one per frame
    assert_eq!(updates.borrow().len(), frames + 1);
  }
}
