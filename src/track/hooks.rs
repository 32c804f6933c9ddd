use crate::playback::TrackEvent;

pub type Hook = Box<dyn FnMut(&TrackEvent)>;

/// Per-event callbacks configured alongside the track options
#[derive(Default)]
pub struct Hooks {
  pub on_before_play: Option<Hook>,
  pub on_play: Option<Hook>,
  pub on_progress: Option<Hook>,
  pub on_pause: Option<Hook>,
  pub on_reset: Option<Hook>,
  pub on_finish: Option<Hook>,
  pub on_seek: Option<Hook>,
}

impl Hooks {
  pub fn on_before_play<F: FnMut(&TrackEvent) + 'static>(mut self, f: F) -> Self {
    self.on_before_play = Some(Box::new(f));
    self
  }

  pub fn on_play<F: FnMut(&TrackEvent) + 'static>(mut self, f: F) -> Self {
    self.on_play = Some(Box::new(f));
    self
  }

  pub fn on_progress<F: FnMut(&TrackEvent) + 'static>(mut self, f: F) -> Self {
    self.on_progress = Some(Box::new(f));
    self
  }

  pub fn on_pause<F: FnMut(&TrackEvent) + 'static>(mut self, f: F) -> Self {
    self.on_pause = Some(Box::new(f));
    self
  }

  pub fn on_reset<F: FnMut(&TrackEvent) + 'static>(mut self, f: F) -> Self {
    self.on_reset = Some(Box::new(f));
    self
  }

  pub fn on_finish<F: FnMut(&TrackEvent) + 'static>(mut self, f: F) -> Self {
    self.on_finish = Some(Box::new(f));
    self
  }

  pub fn on_seek<F: FnMut(&TrackEvent) + 'static>(mut self, f: F) -> Self {
    self.on_seek = Some(Box::new(f));
    self
  }

  pub fn dispatch(&mut self, event: &TrackEvent) {
    let hook = match event {
      TrackEvent::BeforePlay => &mut self.on_before_play,
      TrackEvent::Play => &mut self.on_play,
      TrackEvent::Progress { .. } => &mut self.on_progress,
      TrackEvent::Pause => &mut self.on_pause,
      TrackEvent::Reset => &mut self.on_reset,
      TrackEvent::Finish => &mut self.on_finish,
      TrackEvent::Seek { .. } => &mut self.on_seek,
    };
    if let Some(hook) = hook {
      hook(event);
    }
  }
}
