//! Wavyte playback composites time-ranged media segments onto one output surface in real time.
//!
//! A [`Playlist`] describes tracks of video, image and canvas segments, per-segment shader
//! effects and cross-fade transitions. A [`Compositor`] plays it: every tick it decides which
//! media instances must exist, which are preloaded, which are drawn and in what order, which are
//! destroyed, and which effect parameters apply to each.
//!
//! # Tick overview
//!
//! 1. **Classify**: `Playlist + playhead -> Classification` (to play, playing, finished)
//! 2. **Lifecycle**: preload ahead of the playhead, retire behind it, gate on readiness
//! 3. **Resolve**: effect binding and transition progress per current segment
//! 4. **Draw**: bottom track first, through the host [`Renderer`]
//!
//! Media decoding, shader compilation and audio graphs stay with the host behind the
//! [`MediaSource`], [`Renderer`] and [`AudioRouter`] traits. Headless implementations of each
//! ship with the crate for tests and simulation.
//!
//! The core is single-threaded and tick-driven. A [`Scheduler`] drives any number of
//! compositors from one wall clock.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Optional audio routing.
pub mod audio;
/// Effect definitions, presets and resolution.
pub mod effects;
/// Media sources and their lifecycle.
pub mod media;
/// Transport and scheduling.
pub mod playback;
/// Playlist schema, validation and builders.
pub mod playlist;
/// Renderer capability.
pub mod render;
/// Playhead classification and overview.
pub mod timeline;
/// Cross-fade calculation.
pub mod transitions;

pub use crate::foundation::core::{
    AudioNodeHandle, BusHandle, ElementHandle, ProgramHandle, Resolution, TextureRef, TimeSpan,
};
pub use crate::foundation::error::{
    PlaybackError, PlaybackResult, ShaderStage, ValidationCode, ValidationError,
};
pub use crate::foundation::ordered::OrderedMap;

pub use crate::audio::routing::{AudioManager, AudioRouter};
pub use crate::effects::params::{ParamMap, ParamValue};
pub use crate::effects::presets::EffectPreset;
pub use crate::effects::program::EffectKey;
pub use crate::effects::resolver::{CompiledEffect, DEFAULT_EFFECT_ID, EffectResolver};
pub use crate::media::factory::{FactoryRegistry, MediaSourceFactory};
pub use crate::media::headless::{HeadlessFactory, HeadlessSource, SourceCall, SourceJournal};
pub use crate::media::lifecycle::{LifecycleManager, MediaSourceInstance};
pub use crate::media::listener::{SegmentListener, SegmentListenerId};
pub use crate::media::source::MediaSource;
pub use crate::playback::compositor::{Compositor, PlaybackState, TickOutcome};
pub use crate::playback::events::{CompositorId, EventKind, ListenerId, PlaybackEvent};
pub use crate::playback::opts::CompositorOpts;
pub use crate::playback::scheduler::Scheduler;
pub use crate::playlist::def::{
    EffectBindingDef, EffectSpecDef, PlaylistDef, SegmentDef, TransitionDef,
};
pub use crate::playlist::dsl::{PlaylistBuilder, preset_binding, shader_binding};
pub use crate::playlist::model::{
    EffectBinding, EffectDef, Playlist, Segment, SegmentKind, SegmentSource, Track, Transition,
};
pub use crate::playlist::validate::validate_playlist;
pub use crate::render::headless::{DrawRecord, HeadlessRenderer, RenderLog};
pub use crate::render::renderer::{DrawCall, Renderer};
pub use crate::timeline::classify::{Classification, TrackedSegment, classify};
pub use crate::timeline::overview::{TimelineOverview, timeline_overview};
pub use crate::transitions::overlap::{ActiveTransition, active_transitions};
