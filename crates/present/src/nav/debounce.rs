use std::time::{Duration, Instant};

/// A single pending value that fires once its deadline passes.
///
/// Scheduling while a value is pending replaces it and restarts the delay.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn schedule(&mut self, now: Instant, value: T) {
        self.pending = Some((now + self.delay, value));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Take the pending value if its deadline has been reached.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((at, _)) if now >= at => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }
}
