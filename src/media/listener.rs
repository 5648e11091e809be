use std::collections::HashMap;
use std::rc::Rc;

/// Per-segment hooks. Every hook defaults to a no-op.
///
/// Hooks take `&self`; listeners that need to record state use interior mutability.
pub trait SegmentListener {
    /// The instance started loading.
    fn on_load(&self, _segment_id: &str) {}
    /// The instance started playing.
    fn on_play(&self, _segment_id: &str) {}
    /// The instance was paused.
    fn on_pause(&self, _segment_id: &str) {}
    /// The instance was seeked to `source_time`.
    fn on_seek(&self, _segment_id: &str, _source_time: f64) {}
    /// The instance drew a frame.
    fn on_render(&self, _segment_id: &str) {}
    /// The instance was destroyed.
    fn on_destroy(&self, _segment_id: &str) {}
    /// Return `false` to hold the readiness gate for this segment.
    fn is_ready(&self, _segment_id: &str) -> bool {
        true
    }
}

/// Handle returned by [`ListenerRegistry::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SegmentListenerId(u64);

/// Listeners keyed by segment id.
///
/// Lookups happen at dispatch time, so a listener registered before its instance exists is
/// picked up as soon as the instance is created, and unregistering detaches it everywhere.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    by_segment: HashMap<String, Vec<(SegmentListenerId, Rc<dyn SegmentListener>)>>,
}

impl ListenerRegistry {
    /// Attach `listener` to `segment_id`.
    pub fn register(
        &mut self,
        segment_id: impl Into<String>,
        listener: Rc<dyn SegmentListener>,
    ) -> SegmentListenerId {
        self.next_id += 1;
        let id = SegmentListenerId(self.next_id);
        self.by_segment
            .entry(segment_id.into())
            .or_default()
            .push((id, listener));
        id
    }

    /// Detach a listener. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: SegmentListenerId) -> bool {
        let mut found = false;
        self.by_segment.retain(|_, list| {
            let before = list.len();
            list.retain(|(lid, _)| *lid != id);
            found |= list.len() != before;
            !list.is_empty()
        });
        found
    }

    /// Call `f` on every listener of `segment_id`.
    pub fn each(&self, segment_id: &str, mut f: impl FnMut(&dyn SegmentListener)) {
        if let Some(list) = self.by_segment.get(segment_id) {
            for (_, l) in list {
                f(l.as_ref());
            }
        }
    }

    /// `false` if any listener of `segment_id` vetoes readiness.
    pub fn is_ready(&self, segment_id: &str) -> bool {
        self.by_segment
            .get(segment_id)
            .is_none_or(|list| list.iter().all(|(_, l)| l.is_ready(segment_id)))
    }

    /// Number of listeners attached to `segment_id`.
    pub fn count(&self, segment_id: &str) -> usize {
        self.by_segment.get(segment_id).map_or(0, Vec::len)
    }
}
