use std::rc::Rc;

use crate::{
    audio::routing::{AudioManager, AudioRouter},
    effects::params::{ParamMap, ParamValue, texture_refs},
    effects::resolver::EffectResolver,
    foundation::core::{BusHandle, Resolution},
    foundation::error::{PlaybackError, PlaybackResult},
    media::factory::FactoryRegistry,
    media::lifecycle::{LifecycleManager, MediaSourceInstance},
    media::listener::{SegmentListener, SegmentListenerId},
    playback::events::{CompositorId, EventBus, EventKind, ListenerId, PlaybackEvent},
    playback::opts::CompositorOpts,
    playlist::def::PlaylistDef,
    playlist::model::Playlist,
    timeline::classify::classify,
    transitions::overlap::{ActiveTransition, active_transitions},
};

/// Transport state. "Ended" is `Paused` with the playhead back at 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum PlaybackState {
    /// Never played.
    #[default]
    Idle,
    /// Ticks advance the playhead.
    Playing,
    /// Ticks are no-ops.
    Paused,
}

/// What one [`Compositor::tick`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// Not playing, or no playlist.
    Idle,
    /// A current source is not ready; nothing rendered and the playhead held.
    Stalled,
    /// The playlist ran out on this tick.
    Ended,
    /// Frame drawn; segment ids in draw order (bottom track first).
    Rendered {
        /// Drawn segment ids.
        segments: Vec<String>,
    },
}

/// Plays a [`Playlist`] onto a [`Renderer`](crate::Renderer).
///
/// Each [`Compositor::tick`] runs, in order: classify, natural-end check, preload and retire,
/// the readiness gate, effect sync, audio routing, clear, per-segment draw (last track first so
/// track 0 ends on top), and finally playhead advance.
pub struct Compositor {
    id: CompositorId,
    opts: CompositorOpts,
    state: PlaybackState,
    playhead: f64,
    playlist: Option<Playlist>,
    lifecycle: LifecycleManager,
    effects: EffectResolver,
    audio: AudioManager,
    renderer: Box<dyn crate::Renderer>,
    events: EventBus,
}

impl Compositor {
    /// Build a compositor; compiles the pass-through effect up front.
    pub fn new(
        mut renderer: Box<dyn crate::Renderer>,
        factories: FactoryRegistry,
        opts: CompositorOpts,
    ) -> PlaybackResult<Self> {
        opts.validate()?;
        let effects = EffectResolver::new(renderer.as_mut())?;
        Ok(Self {
            id: CompositorId::next(),
            opts,
            state: PlaybackState::Idle,
            playhead: 0.0,
            playlist: None,
            lifecycle: LifecycleManager::new(factories),
            effects,
            audio: AudioManager::default(),
            renderer,
            events: EventBus::default(),
        })
    }

    /// Route segment audio through `router`.
    pub fn with_audio_router(mut self, router: Box<dyn AudioRouter>) -> Self {
        self.audio = AudioManager::new(router);
        self
    }

    /// Assign a playlist.
    ///
    /// Effects are compiled first; on failure the previous playlist stays. On success every
    /// existing instance is destroyed and state is rebuilt at the current playhead.
    pub fn set_playlist(&mut self, playlist: Playlist) -> PlaybackResult<()> {
        self.effects.sync(self.renderer.as_mut(), playlist.effects())?;
        self.lifecycle.clear();
        self.audio.reset();
        tracing::info!(
            compositor = self.id.get(),
            duration = playlist.duration(),
            tracks = playlist.tracks().len(),
            "playlist assigned"
        );
        self.playlist = Some(playlist);
        self.reseek(self.playhead)
    }

    /// Validate and assign an authored playlist. Validation failures keep the previous one.
    pub fn set_playlist_def(&mut self, def: &PlaylistDef) -> PlaybackResult<()> {
        let playlist = Playlist::from_def(def)?;
        self.set_playlist(playlist)
    }

    /// Parse, validate and assign a JSON playlist.
    pub fn load_playlist_json(&mut self, json: &str) -> PlaybackResult<()> {
        let playlist = Playlist::from_json_str(json)?;
        self.set_playlist(playlist)
    }

    /// Start or resume playback from the current playhead.
    pub fn play(&mut self) {
        if self.state == PlaybackState::Playing {
            return;
        }
        self.state = PlaybackState::Playing;
        tracing::info!(compositor = self.id.get(), playhead = self.playhead, "play");
        self.events.emit(PlaybackEvent::Play {
            playhead: self.playhead,
        });
        self.events.flush(self.id);
    }

    /// Pause playback and every playing source.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.state = PlaybackState::Paused;
        self.lifecycle.pause_all();
        tracing::info!(compositor = self.id.get(), playhead = self.playhead, "pause");
        self.events.emit(PlaybackEvent::Pause {
            playhead: self.playhead,
        });
        self.events.flush(self.id);
    }

    /// Jump to `target` seconds. Negative targets clamp to 0; the transport state is kept.
    #[tracing::instrument(skip(self), fields(compositor = self.id.get()))]
    pub fn seek(&mut self, target: f64) -> PlaybackResult<()> {
        if !target.is_finite() {
            return Err(PlaybackError::config("seek target must be finite"));
        }
        let target = target.max(0.0);
        self.reseek(target)?;
        self.events.emit(PlaybackEvent::Seek { target });
        self.events.flush(self.id);
        Ok(())
    }

    /// Advance by `dt` wall-clock seconds.
    #[tracing::instrument(skip(self), fields(compositor = self.id.get()))]
    pub fn tick(&mut self, dt: f64) -> PlaybackResult<TickOutcome> {
        if self.state != PlaybackState::Playing {
            return Ok(TickOutcome::Idle);
        }
        let Some(playlist) = self.playlist.as_ref() else {
            return Ok(TickOutcome::Idle);
        };
        let playhead = self.playhead;
        let c = classify(playlist, playhead);

        if c.is_exhausted() {
            self.state = PlaybackState::Paused;
            self.lifecycle.pause_all();
            self.reseek(0.0)?;
            tracing::info!(compositor = self.id.get(), playhead, "ended");
            self.events.emit(PlaybackEvent::Ended { playhead });
            self.events.flush(self.id);
            return Ok(TickOutcome::Ended);
        }

        self.lifecycle
            .preload(&c, playhead, self.opts.preload_lookahead_sec)?;
        self.lifecycle
            .retire(&c, playhead, self.opts.post_play_retention_sec);
        if !self.lifecycle.ensure_ready(&c, playhead)? {
            return Ok(TickOutcome::Stalled);
        }

        self.effects.sync(self.renderer.as_mut(), playlist.effects())?;
        self.audio.update(&self.lifecycle);
        self.renderer.clear();

        let transitions = active_transitions(playlist, &c, playhead);
        let output = self.renderer.output_resolution();
        let mut drawn = Vec::with_capacity(c.currently_playing.len());
        for entry in c.currently_playing.iter().rev() {
            let id = entry.segment.id.as_str();
            self.lifecycle.play(id);
            let Some(inst) = self.lifecycle.get(id) else {
                continue;
            };
            let mut base = base_params(inst, playhead, output, self.opts.playback_rate);
            if let Some((t, index)) = transitions
                .iter()
                .find_map(|t| t.input_index(id).map(|i| (t, i)))
            {
                base.insert(
                    "transition_progress".to_owned(),
                    t.clamped_progress().into(),
                );
                base.insert("transition_input_index".to_owned(), (index as f64).into());
            }

            let effect = self.effects.resolve(id);
            let params = effect.merged_params(&base);
            let textures = texture_refs(&params);
            self.lifecycle.render(
                id,
                self.renderer.as_mut(),
                effect.program,
                &params,
                &textures,
            )?;
            drawn.push(id.to_owned());
        }

        let step = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.playhead += step * self.opts.playback_rate;
        Ok(TickOutcome::Rendered { segments: drawn })
    }

    /// Run one zero-length tick as if playing, then restore the transport state.
    ///
    /// Loads sources around the playhead ahead of [`Compositor::play`].
    pub fn preload(&mut self) -> PlaybackResult<TickOutcome> {
        let prev = self.state;
        self.state = PlaybackState::Playing;
        let out = self.tick(0.0);
        if prev != PlaybackState::Playing {
            self.lifecycle.pause_all();
        }
        self.state = prev;
        out
    }

    /// Set the playback rate. Negative rates clamp to 0.
    pub fn set_playback_rate(&mut self, rate: f64) -> PlaybackResult<()> {
        if !rate.is_finite() {
            return Err(PlaybackError::config("playback_rate must be finite"));
        }
        self.opts.playback_rate = rate.max(0.0);
        Ok(())
    }

    /// Set the preload lookahead in seconds.
    pub fn set_preload_lookahead(&mut self, secs: f64) -> PlaybackResult<()> {
        let opts = CompositorOpts {
            preload_lookahead_sec: secs,
            ..self.opts.clone()
        };
        opts.validate()?;
        self.opts = opts;
        Ok(())
    }

    /// Set the post-play retention in seconds.
    pub fn set_post_play_retention(&mut self, secs: f64) -> PlaybackResult<()> {
        let opts = CompositorOpts {
            post_play_retention_sec: secs,
            ..self.opts.clone()
        };
        opts.validate()?;
        self.opts = opts;
        Ok(())
    }

    /// Create (or fetch) the audio bus for `track_index`. `None` without an audio router.
    pub fn audio_bus_for_track(&mut self, track_index: usize) -> Option<BusHandle> {
        self.audio.bus_for_track(track_index)
    }

    /// Attach a listener to `segment_id`, now or whenever its instance is created.
    pub fn register_segment_listener(
        &mut self,
        segment_id: impl Into<String>,
        listener: Rc<dyn SegmentListener>,
    ) -> SegmentListenerId {
        self.lifecycle.listeners_mut().register(segment_id, listener)
    }

    /// Detach a segment listener.
    pub fn unregister_segment_listener(&mut self, id: SegmentListenerId) -> bool {
        self.lifecycle.listeners_mut().unregister(id)
    }

    /// Subscribe to transport events of `kind`.
    ///
    /// Handlers run after the compositor's state is consistent; they must not call back into
    /// the compositor.
    pub fn add_event_listener(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(CompositorId, &PlaybackEvent) + 'static,
    ) -> ListenerId {
        self.events.add(kind, handler)
    }

    /// Unsubscribe an event listener.
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.events.remove(id)
    }

    /// Transitions active at the current playhead.
    pub fn active_transitions(&self) -> Vec<ActiveTransition> {
        match &self.playlist {
            Some(p) => active_transitions(p, &classify(p, self.playhead), self.playhead),
            None => Vec::new(),
        }
    }

    /// Compositor identity.
    pub fn id(&self) -> CompositorId {
        self.id
    }

    /// Playhead in seconds.
    pub fn current_time(&self) -> f64 {
        self.playhead
    }

    /// Playlist duration, 0 without a playlist.
    pub fn duration(&self) -> f64 {
        self.playlist.as_ref().map_or(0.0, Playlist::duration)
    }

    /// Transport state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current options.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Assigned playlist.
    pub fn playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    /// Ids of live media instances.
    pub fn instance_ids(&self) -> Vec<String> {
        self.lifecycle.ids()
    }

    /// Live instance for `segment_id`.
    pub fn instance(&self, segment_id: &str) -> Option<&MediaSourceInstance> {
        self.lifecycle.get(segment_id)
    }

    /// Effect resolver state.
    pub fn effects(&self) -> &EffectResolver {
        &self.effects
    }

    fn reseek(&mut self, target: f64) -> PlaybackResult<()> {
        self.playhead = target;
        self.audio.reset();
        if let Some(p) = self.playlist.as_ref() {
            let c = classify(p, target);
            self.lifecycle.seek(&c, target)?;
        }
        Ok(())
    }
}

fn base_params(
    inst: &MediaSourceInstance,
    playhead: f64,
    output: Resolution,
    playback_rate: f64,
) -> ParamMap {
    let mut p = ParamMap::new();
    p.insert(
        "progress".to_owned(),
        ParamValue::Number(inst.progress_at(playhead)),
    );
    p.insert(
        "duration".to_owned(),
        ParamValue::Number(inst.duration()),
    );
    p.insert(
        "source_resolution".to_owned(),
        ParamValue::Vec2(inst.resolution().as_vec2()),
    );
    p.insert(
        "output_resolution".to_owned(),
        ParamValue::Vec2(output.as_vec2()),
    );
    p.insert(
        "playback_rate".to_owned(),
        ParamValue::Number(playback_rate),
    );
    p
}

#[cfg(test)]
#[path = "../../tests/unit/playback/compositor.rs"]
mod tests;
