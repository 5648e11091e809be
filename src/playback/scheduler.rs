use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::{
    foundation::error::PlaybackResult,
    playback::compositor::{Compositor, TickOutcome},
    playback::events::CompositorId,
};

/// Drives registered compositors from one wall clock.
///
/// Holds weak references only: a compositor dropped by its owner silently leaves the schedule.
/// The first tick establishes the time baseline and advances by zero.
#[derive(Default)]
pub struct Scheduler {
    entries: Vec<Weak<RefCell<Compositor>>>,
    origin: Option<Instant>,
    last: Option<Duration>,
}

impl Scheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `compositor` to the schedule. Registering twice is a no-op.
    pub fn register(&mut self, compositor: &Rc<RefCell<Compositor>>) {
        let weak = Rc::downgrade(compositor);
        if !self.entries.iter().any(|e| e.ptr_eq(&weak)) {
            self.entries.push(weak);
        }
    }

    /// Remove `compositor`. Returns `false` if it was not registered.
    pub fn unregister(&mut self, compositor: &Rc<RefCell<Compositor>>) -> bool {
        let weak = Rc::downgrade(compositor);
        let before = self.entries.len();
        self.entries.retain(|e| !e.ptr_eq(&weak));
        self.entries.len() != before
    }

    /// Number of live registered compositors.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.strong_count() > 0).count()
    }

    /// `true` when no live compositor is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tick using [`Instant::now`].
    pub fn tick_now(&mut self) -> Vec<(CompositorId, PlaybackResult<TickOutcome>)> {
        let origin = *self.origin.get_or_insert_with(Instant::now);
        self.tick_at(origin.elapsed())
    }

    /// Tick every compositor with the delta since the previous call.
    ///
    /// `now` is a monotonic timestamp from any fixed origin. Compositors already borrowed
    /// elsewhere are skipped for this tick.
    pub fn tick_at(&mut self, now: Duration) -> Vec<(CompositorId, PlaybackResult<TickOutcome>)> {
        let dt = match self.last {
            Some(prev) => now.saturating_sub(prev).as_secs_f64(),
            None => 0.0,
        };
        self.last = Some(now);

        self.entries.retain(|e| e.strong_count() > 0);
        let mut out = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let Some(rc) = entry.upgrade() else {
                continue;
            };
            let Ok(mut comp) = rc.try_borrow_mut() else {
                tracing::trace!("compositor busy; skipping tick");
                continue;
            };
            out.push((comp.id(), comp.tick(dt)));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
