use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one compositor, carried by every event it emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositorId(u64);

impl CompositorId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Transport events delivered to host listeners.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Playback started or resumed.
    Play {
        /// Playhead at the transition.
        playhead: f64,
    },
    /// Playback paused by the host.
    Pause {
        /// Playhead at the transition.
        playhead: f64,
    },
    /// The playlist ran out; the playhead has been reset to 0.
    Ended {
        /// Playhead before the reset.
        playhead: f64,
    },
    /// Explicit seek.
    Seek {
        /// Seek target.
        target: f64,
    },
}

impl PlaybackEvent {
    /// Discriminant used for listener registration.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Play { .. } => EventKind::Play,
            Self::Pause { .. } => EventKind::Pause,
            Self::Ended { .. } => EventKind::Ended,
            Self::Seek { .. } => EventKind::Seek,
        }
    }
}

/// Event types a listener can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`PlaybackEvent::Play`].
    Play,
    /// [`PlaybackEvent::Pause`].
    Pause,
    /// [`PlaybackEvent::Ended`].
    Ended,
    /// [`PlaybackEvent::Seek`].
    Seek,
}

/// Handle returned when registering an event listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler = Box<dyn FnMut(CompositorId, &PlaybackEvent)>;

/// Listener table plus a queue of events not yet delivered.
///
/// Events are queued while the compositor mutates its state and delivered by
/// [`EventBus::flush`] once that state is consistent.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(ListenerId, EventKind, Handler)>,
    pending: Vec<PlaybackEvent>,
}

impl EventBus {
    /// Subscribe `handler` to events of `kind`.
    pub fn add(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(CompositorId, &PlaybackEvent) + 'static,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, kind, Box::new(handler)));
        id
    }

    /// Unsubscribe. Returns `false` for unknown ids.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Queue an event.
    pub fn emit(&mut self, event: PlaybackEvent) {
        self.pending.push(event);
    }

    /// Deliver queued events in order. Returns the delivered events.
    pub fn flush(&mut self, from: CompositorId) -> Vec<PlaybackEvent> {
        let pending = std::mem::take(&mut self.pending);
        for event in &pending {
            let kind = event.kind();
            for (_, k, handler) in self.listeners.iter_mut() {
                if *k == kind {
                    handler(from, event);
                }
            }
        }
        pending
    }
}
