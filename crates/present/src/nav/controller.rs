use std::time::{Duration, Instant};

use super::debounce::Debouncer;
use super::fragment;
use super::keys::{self, Command, KeyInput};
use super::scale::{self, Viewport};
use super::state::{self, SlideState};

/// Delay between the last resize event and the rescale it triggers.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(200);

/// What the controller draws on. The host owns the address fragment, the
/// slides, the container and the help overlay.
pub trait Surface {
    /// Current address fragment, e.g. `#3`.
    fn location(&self) -> String;

    /// Replace the address fragment without notifying anyone.
    fn replace_location(&mut self, fragment: &str);

    fn set_slide_state(&mut self, index: usize, state: Option<SlideState>);

    fn set_scale(&mut self, ratio: f32);

    fn hide_help(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    LocationChanged,
    Resized(Viewport),
    Key(KeyInput),
}

pub struct Controller<S: Surface> {
    surface: S,
    slide_count: usize,
    resize: Debouncer<Viewport>,
}

impl<S: Surface> Controller<S> {
    pub fn new(surface: S, slide_count: usize) -> Self {
        Self {
            surface,
            slide_count,
            resize: Debouncer::new(RESIZE_DEBOUNCE),
        }
    }

    /// Render the slide named by the fragment, or normalize to `#0` when the
    /// fragment is missing or invalid, then fit the container to `viewport`.
    /// A valid fragment written loosely (`3`, `#03`) is rewritten as `#3`.
    pub fn start(&mut self, viewport: Viewport) {
        match self.current_index() {
            Some(index) => {
                let canonical = fragment::format(index);
                if self.surface.location() != canonical {
                    self.surface.replace_location(&canonical);
                }
                self.go_to(index);
            }
            None => self.navigate(0),
        }
        self.rescale(viewport);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn current_index(&self) -> Option<usize> {
        fragment::parse(&self.surface.location())
    }

    /// Relabel every slide for `target`. Past the end leaves all slides cleared.
    pub fn go_to(&mut self, target: usize) {
        tracing::debug!(index = target, count = self.slide_count, "go to slide");
        for (index, label) in state::labels(target, self.slide_count)
            .into_iter()
            .enumerate()
        {
            self.surface.set_slide_state(index, label);
        }
    }

    pub fn handle(&mut self, event: Event, now: Instant) {
        match event {
            Event::LocationChanged => self.on_location_changed(),
            Event::Resized(viewport) => self.on_resize(viewport, now),
            Event::Key(input) => self.on_key(input),
        }
    }

    pub fn on_location_changed(&mut self) {
        match self.current_index() {
            Some(index) => self.go_to(index),
            None => {
                tracing::debug!(location = %self.surface.location(), "invalid location, resetting");
                self.surface.replace_location(&fragment::format(0));
                self.go_to(0);
            }
        }
    }

    pub fn on_key(&mut self, input: KeyInput) {
        match keys::command_for(input) {
            Command::Forward => self.move_forward(),
            Command::Backward => self.move_backward(),
            Command::DismissHelp => self.surface.hide_help(),
        }
    }

    pub fn on_resize(&mut self, viewport: Viewport, now: Instant) {
        tracing::trace!(?viewport, "resize scheduled");
        self.resize.schedule(now, viewport);
    }

    /// Run a pending rescale whose delay has elapsed. Returns true if one ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.resize.poll(now) {
            Some(viewport) => {
                self.rescale(viewport);
                true
            }
            None => false,
        }
    }

    /// When the pending rescale is due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }

    pub fn rescale(&mut self, viewport: Viewport) {
        match scale::scale_factor(viewport) {
            Some(ratio) => {
                tracing::debug!(ratio, ?viewport, "rescale");
                self.surface.set_scale(ratio);
            }
            None => tracing::debug!(?viewport, "empty viewport, keeping scale"),
        }
    }

    pub fn move_forward(&mut self) {
        if let Some(index) = self.current_index() {
            if index < self.slide_count.saturating_sub(1) {
                self.navigate(index + 1);
            } else {
                tracing::debug!(index, "already at last slide");
            }
        }
        self.surface.hide_help();
    }

    pub fn move_backward(&mut self) {
        if let Some(index) = self.current_index() {
            if index > 0 {
                self.navigate(index - 1);
            } else {
                tracing::debug!("already at first slide");
            }
        }
        self.surface.hide_help();
    }

    fn navigate(&mut self, index: usize) {
        self.surface.replace_location(&fragment::format(index));
        self.on_location_changed();
    }
}
