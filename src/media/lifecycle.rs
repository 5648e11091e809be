use std::collections::BTreeMap;

use crate::{
    effects::params::ParamMap,
    foundation::core::{ElementHandle, ProgramHandle, Resolution, TextureRef},
    foundation::error::PlaybackResult,
    media::factory::FactoryRegistry,
    media::listener::ListenerRegistry,
    media::source::MediaSource,
    playlist::model::{Segment, SegmentKind},
    render::renderer::Renderer,
    timeline::classify::Classification,
};

/// Deferred action run once when an instance is first observed ready.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OnReady {
    /// Seek the source to the media time matching this timeline playhead.
    SeekTo(f64),
}

/// Live media source for one segment. Owned exclusively by [`LifecycleManager`].
pub struct MediaSourceInstance {
    segment: Segment,
    kind: SegmentKind,
    track_index: usize,
    source: Box<dyn MediaSource>,
    on_ready: Option<OnReady>,
    ready: bool,
    playing: bool,
    has_played: bool,
}

impl MediaSourceInstance {
    /// Segment id.
    pub fn id(&self) -> &str {
        &self.segment.id
    }

    /// Resolved media kind.
    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// Track the segment belongs to.
    pub fn track_index(&self) -> usize {
        self.track_index
    }

    /// Segment volume in `[0, 1]`.
    pub fn volume(&self) -> f64 {
        self.segment.volume
    }

    /// Readiness as of the last poll.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// `true` while the media clock runs.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// `true` once the instance has entered the playing state at least once.
    pub fn has_played(&self) -> bool {
        self.has_played
    }

    /// Intrinsic media size.
    pub fn resolution(&self) -> Resolution {
        self.source.resolution()
    }

    /// Element whose audio can be routed.
    pub fn audio_element(&self) -> Option<ElementHandle> {
        self.source.audio_element()
    }

    /// Segment this instance was created for.
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Media-local time for a timeline playhead.
    pub fn source_time_at(&self, playhead: f64) -> f64 {
        self.segment.source_time_at(playhead)
    }

    /// Progress through the segment at `playhead`.
    pub fn progress_at(&self, playhead: f64) -> f64 {
        self.segment.progress_at(playhead)
    }

    /// Segment duration in seconds.
    pub fn duration(&self) -> f64 {
        self.segment.duration
    }

    fn seek_to(&mut self, playhead: f64, listeners: &ListenerRegistry) {
        let t = self.source_time_at(playhead);
        let id = self.segment.id.as_str();
        tracing::debug!(segment = %id, playhead, source_time = t, "seek instance");
        self.source.seek(t);
        listeners.each(id, |l| l.on_seek(id, t));
    }

    fn destroy(mut self, listeners: &ListenerRegistry) {
        let id = self.segment.id.as_str();
        tracing::debug!(segment = %id, "destroy instance");
        self.source.destroy();
        listeners.each(id, |l| l.on_destroy(id));
    }
}

/// Owns every live [`MediaSourceInstance`] and moves them through their lifecycle.
pub struct LifecycleManager {
    instances: BTreeMap<String, MediaSourceInstance>,
    factories: FactoryRegistry,
    listeners: ListenerRegistry,
}

impl LifecycleManager {
    /// Manager creating sources through `factories`.
    pub fn new(factories: FactoryRegistry) -> Self {
        Self {
            instances: BTreeMap::new(),
            factories,
            listeners: ListenerRegistry::default(),
        }
    }

    /// Segment listeners.
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Mutable segment listeners.
    pub fn listeners_mut(&mut self) -> &mut ListenerRegistry {
        &mut self.listeners
    }

    /// Live instance for `id`.
    pub fn get(&self, id: &str) -> Option<&MediaSourceInstance> {
        self.instances.get(id)
    }

    /// Live instances in id order.
    pub fn instances(&self) -> impl Iterator<Item = &MediaSourceInstance> {
        self.instances.values()
    }

    /// Live instance ids in sorted order.
    pub fn ids(&self) -> Vec<String> {
        self.instances.keys().cloned().collect()
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// `true` when no instance is live.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Create instances for upcoming segments starting before `playhead + lookahead`.
    ///
    /// `to_play` is already sorted by start, so the earliest segments load first.
    pub fn preload(
        &mut self,
        classification: &Classification<'_>,
        playhead: f64,
        lookahead: f64,
    ) -> PlaybackResult<()> {
        let horizon = playhead + lookahead;
        for entry in &classification.to_play {
            if entry.segment.start >= horizon {
                break;
            }
            if !self.instances.contains_key(&entry.segment.id) {
                self.create(entry.segment, entry.track_index, OnReady::SeekTo(playhead))?;
            }
        }
        Ok(())
    }

    /// Destroy instances whose segment ended more than `retention` seconds ago.
    pub fn retire(&mut self, classification: &Classification<'_>, playhead: f64, retention: f64) {
        let mut staged = Vec::new();
        for entry in &classification.finished {
            if entry.segment.end() < playhead - retention
                && self.instances.contains_key(&entry.segment.id)
            {
                staged.push(entry.segment.id.as_str());
            }
        }
        for id in staged {
            self.destroy(id);
        }
    }

    /// Readiness gate for the current segments.
    ///
    /// Creates missing instances, polls every live instance (firing pending on-ready actions),
    /// and returns `true` only if every currently-playing instance is ready.
    pub fn ensure_ready(
        &mut self,
        classification: &Classification<'_>,
        playhead: f64,
    ) -> PlaybackResult<bool> {
        for entry in &classification.currently_playing {
            if !self.instances.contains_key(&entry.segment.id) {
                self.create(entry.segment, entry.track_index, OnReady::SeekTo(playhead))?;
            }
        }
        self.poll();

        let mut all_ready = true;
        for entry in &classification.currently_playing {
            let ready = self
                .instances
                .get(&entry.segment.id)
                .is_some_and(|i| i.ready);
            if !ready {
                tracing::trace!(segment = %entry.segment.id, playhead, "waiting for source");
                all_ready = false;
            }
        }
        Ok(all_ready)
    }

    /// Poll readiness of every instance and fire pending on-ready actions.
    pub fn poll(&mut self) {
        let listeners = &self.listeners;
        for inst in self.instances.values_mut() {
            inst.ready = inst.source.is_ready() && listeners.is_ready(inst.id());
            if inst.ready
                && let Some(OnReady::SeekTo(t)) = inst.on_ready.take()
            {
                inst.seek_to(t, listeners);
            }
        }
    }

    /// Rebuild instance state for a discontinuous jump to `playhead`.
    ///
    /// Instances outside the new current set are destroyed, as are instances that have ever
    /// played. Surviving current instances are seeked; missing ones are created with a
    /// deferred seek.
    pub fn seek(&mut self, classification: &Classification<'_>, playhead: f64) -> PlaybackResult<()> {
        let staged: Vec<String> = self
            .instances
            .values()
            .filter(|i| i.has_played || !classification.is_playing(i.id()))
            .map(|i| i.id().to_owned())
            .collect();
        for id in &staged {
            self.destroy(id);
        }

        for entry in &classification.currently_playing {
            match self.instances.get_mut(&entry.segment.id) {
                Some(inst) if inst.ready => inst.seek_to(playhead, &self.listeners),
                Some(inst) => inst.on_ready = Some(OnReady::SeekTo(playhead)),
                None => {
                    self.create(entry.segment, entry.track_index, OnReady::SeekTo(playhead))?;
                }
            }
        }
        Ok(())
    }

    /// Start playback on `id` if it is not already playing.
    pub fn play(&mut self, id: &str) {
        let listeners = &self.listeners;
        if let Some(inst) = self.instances.get_mut(id)
            && !inst.playing
        {
            inst.source.play();
            inst.playing = true;
            inst.has_played = true;
            listeners.each(id, |l| l.on_play(id));
        }
    }

    /// Pause every playing instance.
    pub fn pause_all(&mut self) {
        let listeners = &self.listeners;
        for inst in self.instances.values_mut().filter(|i| i.playing) {
            inst.source.pause();
            inst.playing = false;
            listeners.each(inst.id(), |l| l.on_pause(inst.id()));
        }
    }

    /// Draw `id` through `renderer`.
    pub fn render(
        &mut self,
        id: &str,
        renderer: &mut dyn Renderer,
        program: ProgramHandle,
        params: &ParamMap,
        textures: &[TextureRef],
    ) -> PlaybackResult<()> {
        let listeners = &self.listeners;
        if let Some(inst) = self.instances.get_mut(id) {
            inst.source.render(renderer, program, params, textures)?;
            listeners.each(id, |l| l.on_render(id));
        }
        Ok(())
    }

    /// Destroy every instance.
    pub fn clear(&mut self) {
        let all = std::mem::take(&mut self.instances);
        for inst in all.into_values() {
            inst.destroy(&self.listeners);
        }
    }

    fn create(
        &mut self,
        segment: &Segment,
        track_index: usize,
        on_ready: OnReady,
    ) -> PlaybackResult<()> {
        let source = self.factories.create(segment)?;
        let kind = segment.kind()?;
        tracing::debug!(segment = %segment.id, %kind, track_index, "create instance");

        let mut inst = MediaSourceInstance {
            segment: segment.clone(),
            kind,
            track_index,
            source,
            on_ready: Some(on_ready),
            ready: false,
            playing: false,
            has_played: false,
        };

        tracing::debug!(segment = %segment.id, "load instance");
        let immediate = inst.source.load()?;
        self.listeners.each(inst.id(), |l| l.on_load(inst.id()));
        if immediate {
            inst.ready = self.listeners.is_ready(inst.id());
            if inst.ready
                && let Some(OnReady::SeekTo(t)) = inst.on_ready.take()
            {
                inst.seek_to(t, &self.listeners);
            }
        }
        self.instances.insert(segment.id.clone(), inst);
        Ok(())
    }

    fn destroy(&mut self, id: &str) {
        if let Some(inst) = self.instances.remove(id) {
            inst.destroy(&self.listeners);
        }
    }
}

impl Drop for LifecycleManager {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/lifecycle.rs"]
mod tests;
