use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{
    effects::params::ParamMap,
    foundation::core::{ElementHandle, ProgramHandle, Resolution, TextureRef},
    foundation::error::PlaybackResult,
    media::factory::MediaSourceFactory,
    media::source::MediaSource,
    playlist::model::{Segment, SegmentKind, SegmentSource},
    render::renderer::{DrawCall, Renderer},
};

/// A call observed by a [`HeadlessSource`].
#[derive(Clone, Debug, PartialEq)]
pub enum SourceCall {
    /// Source created by the factory.
    Create,
    /// `load()`.
    Load,
    /// `play()`.
    Play,
    /// `pause()`.
    Pause,
    /// `seek(source_time)`.
    Seek(f64),
    /// `render(..)` with this program.
    Render(ProgramHandle),
    /// `destroy()`.
    Destroy,
}

/// Ordered log of source calls across all headless sources of one factory.
#[derive(Clone, Debug, Default)]
pub struct SourceJournal {
    entries: Vec<(String, SourceCall)>,
}

impl SourceJournal {
    /// All `(segment id, call)` entries in order.
    pub fn entries(&self) -> &[(String, SourceCall)] {
        &self.entries
    }

    /// Calls observed for one segment.
    pub fn calls_for(&self, id: &str) -> Vec<SourceCall> {
        self.entries
            .iter()
            .filter(|(i, _)| i == id)
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// Number of `call` entries for `id`.
    pub fn count(&self, id: &str, call: &SourceCall) -> usize {
        self.entries
            .iter()
            .filter(|(i, c)| i == id && c == call)
            .count()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn record(&mut self, id: &str, call: SourceCall) {
        self.entries.push((id.to_owned(), call));
    }
}

/// Shared journal handle.
pub type SharedJournal = Rc<RefCell<SourceJournal>>;

/// In-memory media source.
///
/// Becomes ready after `ready_after` readiness polls following `load()`; with `ready_after == 0`
/// the load completes synchronously.
pub struct HeadlessSource {
    id: String,
    resolution: Resolution,
    element: Option<ElementHandle>,
    ready_after: usize,
    polls: Cell<usize>,
    loaded: bool,
    destroyed: bool,
    journal: SharedJournal,
}

impl HeadlessSource {
    fn record(&self, call: SourceCall) {
        self.journal.borrow_mut().record(&self.id, call);
    }
}

impl MediaSource for HeadlessSource {
    fn load(&mut self) -> PlaybackResult<bool> {
        self.loaded = true;
        self.record(SourceCall::Load);
        Ok(self.ready_after == 0)
    }

    fn play(&mut self) {
        self.record(SourceCall::Play);
    }

    fn pause(&mut self) {
        self.record(SourceCall::Pause);
    }

    fn seek(&mut self, source_time: f64) {
        self.record(SourceCall::Seek(source_time));
    }

    fn is_ready(&self) -> bool {
        if !self.loaded || self.destroyed {
            return false;
        }
        if self.polls.get() >= self.ready_after {
            return true;
        }
        self.polls.set(self.polls.get() + 1);
        false
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.record(SourceCall::Destroy);
    }

    fn render(
        &mut self,
        renderer: &mut dyn Renderer,
        program: ProgramHandle,
        params: &ParamMap,
        textures: &[TextureRef],
    ) -> PlaybackResult<()> {
        self.record(SourceCall::Render(program));
        let frame = TextureRef::new(self.id.as_str());
        renderer.draw(DrawCall {
            program,
            source: &frame,
            params,
            textures,
        })
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn audio_element(&self) -> Option<ElementHandle> {
        self.element
    }
}

/// Factory producing [`HeadlessSource`]s that all write to one journal.
#[derive(Clone)]
pub struct HeadlessFactory {
    ready_after: usize,
    resolution: Resolution,
    journal: SharedJournal,
    next_element: Rc<Cell<u64>>,
}

impl Default for HeadlessFactory {
    fn default() -> Self {
        Self::new(0)
    }
}

impl HeadlessFactory {
    /// Factory whose sources become ready after `ready_after` polls.
    pub fn new(ready_after: usize) -> Self {
        Self {
            ready_after,
            resolution: Resolution::new(1920, 1080),
            journal: SharedJournal::default(),
            next_element: Rc::new(Cell::new(1 << 32)),
        }
    }

    /// Intrinsic size reported by image and video sources.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Shared journal handle.
    pub fn journal(&self) -> SharedJournal {
        Rc::clone(&self.journal)
    }
}

impl MediaSourceFactory for HeadlessFactory {
    fn create(&self, kind: SegmentKind, segment: &Segment) -> PlaybackResult<Box<dyn MediaSource>> {
        let resolution = match (kind, segment.width, segment.height) {
            (SegmentKind::Canvas, Some(w), Some(h)) => Resolution::new(w, h),
            _ => self.resolution,
        };
        // Only video carries sound; `src` videos get a synthetic element.
        let element = match (kind, &segment.source) {
            (SegmentKind::Video, SegmentSource::Element(e)) => Some(*e),
            (SegmentKind::Video, SegmentSource::Src(_)) => {
                let e = self.next_element.get();
                self.next_element.set(e + 1);
                Some(ElementHandle(e))
            }
            _ => None,
        };
        let source = HeadlessSource {
            id: segment.id.clone(),
            resolution,
            element,
            ready_after: self.ready_after,
            polls: Cell::new(0),
            loaded: false,
            destroyed: false,
            journal: self.journal(),
        };
        source.record(SourceCall::Create);
        Ok(Box::new(source))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/headless.rs"]
mod tests;
