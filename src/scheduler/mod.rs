/// Frame scheduling capability injected into playback.
/// The host delivers a requested frame by calling back with its token and
/// a timestamp; a cancelled token must never be delivered.
use std::{cell::RefCell, rc::Rc, time::Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

pub trait FrameScheduler {
  fn request_frame(&mut self) -> FrameToken;
  fn cancel_frame(&mut self, token: FrameToken);
  /// Monotonic time in milliseconds
  fn now(&self) -> f64;
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for Box<T> {
  fn request_frame(&mut self) -> FrameToken {
    (**self).request_frame()
  }

  fn cancel_frame(&mut self, token: FrameToken) {
    (**self).cancel_frame(token)
  }

  fn now(&self) -> f64 {
    (**self).now()
  }
}

/// Lets the host keep a handle on the scheduler it hands over to playback
impl<T: FrameScheduler> FrameScheduler for Rc<RefCell<T>> {
  fn request_frame(&mut self) -> FrameToken {
    self.borrow_mut().request_frame()
  }

  fn cancel_frame(&mut self, token: FrameToken) {
    self.borrow_mut().cancel_frame(token)
  }

  fn now(&self) -> f64 {
    self.borrow().now()
  }
}

/// Keeps track of the single outstanding frame request
#[derive(Debug, Default)]
struct Slot {
  next_id: u64,
  pending: Option<FrameToken>,
  requested: usize,
  cancelled: usize,
}

impl Slot {
  fn request(&mut self) -> FrameToken {
    self.next_id += 1;
    let token = FrameToken(self.next_id);
    self.pending = Some(token);
    self.requested += 1;
    token
  }

  fn cancel(&mut self, token: FrameToken) {
    if self.pending == Some(token) {
      self.pending = None;
      self.cancelled += 1;
    }
  }
}

/// Deterministic scheduler with a hand-driven clock
#[derive(Debug, Default)]
pub struct ManualScheduler {
  slot: Slot,
  now: f64,
}

impl ManualScheduler {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn pending(&self) -> Option<FrameToken> {
    self.slot.pending
  }

  pub fn requested(&self) -> usize {
    self.slot.requested
  }

  pub fn cancelled(&self) -> usize {
    self.slot.cancelled
  }

  pub fn set_time(&mut self, ms: f64) {
    self.now = ms;
  }

  pub fn advance(&mut self, ms: f64) -> f64 {
    self.now += ms;
    self.now
  }

  /// Takes the pending token for delivery, the way a host would before
  /// invoking the frame callback
  pub fn take(&mut self) -> Option<FrameToken> {
    self.slot.pending.take()
  }
}

impl FrameScheduler for ManualScheduler {
  fn request_frame(&mut self) -> FrameToken {
    self.slot.request()
  }

  fn cancel_frame(&mut self, token: FrameToken) {
    self.slot.cancel(token)
  }

  fn now(&self) -> f64 {
    self.now
  }
}

/// Wall clock scheduler for hosts running their own frame loop
#[derive(Debug)]
pub struct MonotonicScheduler {
  slot: Slot,
  started: Instant,
}

impl MonotonicScheduler {
  pub fn new() -> Self {
    Self {
      slot: Slot::default(),
      started: Instant::now(),
    }
  }

  pub fn take(&mut self) -> Option<FrameToken> {
    self.slot.pending.take()
  }

  pub fn pending(&self) -> Option<FrameToken> {
    self.slot.pending
  }
}

impl Default for MonotonicScheduler {
  fn default() -> Self {
    Self::new()
  }
}

impl FrameScheduler for MonotonicScheduler {
  fn request_frame(&mut self) -> FrameToken {
    self.slot.request()
  }

  fn cancel_frame(&mut self, token: FrameToken) {
    self.slot.cancel(token)
  }

  fn now(&self) -> f64 {
    self.started.elapsed().as_secs_f64() * 1000.0
  }
}
