use std::collections::HashMap;

use crate::{
    foundation::error::{PlaybackError, PlaybackResult},
    media::headless::HeadlessFactory,
    media::source::MediaSource,
    playlist::model::{Segment, SegmentKind},
};

/// Creates media sources for one or more segment kinds.
pub trait MediaSourceFactory {
    /// Instantiate a source for `segment`, already resolved to `kind`.
    fn create(&self, kind: SegmentKind, segment: &Segment) -> PlaybackResult<Box<dyn MediaSource>>;
}

/// Factories keyed by [`SegmentKind`].
#[derive(Default)]
pub struct FactoryRegistry {
    factories: HashMap<SegmentKind, Box<dyn MediaSourceFactory>>,
}

impl FactoryRegistry {
    /// Registry with no factories; every segment is unsupported until one is registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry backed by [`HeadlessFactory`] defaults for every kind.
    pub fn headless() -> Self {
        Self::with_headless(&HeadlessFactory::default())
    }

    /// Registry backed by clones of `factory` for every kind.
    pub fn with_headless(factory: &HeadlessFactory) -> Self {
        let mut out = Self::new();
        for kind in [SegmentKind::Video, SegmentKind::Image, SegmentKind::Canvas] {
            out.register(kind, factory.clone());
        }
        out
    }

    /// Register (or replace) the factory for `kind`.
    pub fn register(&mut self, kind: SegmentKind, factory: impl MediaSourceFactory + 'static) {
        self.factories.insert(kind, Box::new(factory));
    }

    /// `true` if a factory handles `kind`.
    pub fn supports(&self, kind: SegmentKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Instantiate the source for `segment`.
    ///
    /// Fails with [`PlaybackError::UnsupportedSegmentType`] for unknown tags or kinds without a
    /// registered factory.
    pub fn create(&self, segment: &Segment) -> PlaybackResult<Box<dyn MediaSource>> {
        let kind = segment.kind()?;
        let factory = self
            .factories
            .get(&kind)
            .ok_or_else(|| PlaybackError::unsupported_type(&segment.id, &segment.type_tag))?;
        factory.create(kind, segment)
    }
}
