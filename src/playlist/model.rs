use std::fmt;

use smallvec::SmallVec;

use crate::{
    effects::params::{ParamMap, overlay},
    effects::shaders::{DEFAULT_FRAGMENT_SHADER, DEFAULT_VERTEX_SHADER},
    foundation::core::{ElementHandle, TimeSpan},
    foundation::error::{PlaybackError, PlaybackResult},
    foundation::ordered::OrderedMap,
    playlist::def::{EffectBindingDef, EffectSpecDef, PlaylistDef, SegmentDef, TransitionDef},
    playlist::validate::validate_playlist,
};

/// A validated, immutable playlist.
///
/// The only way to obtain one is through validation ([`Playlist::from_def`] and friends), so
/// every `Playlist` upholds the structural invariants: unique ids, exactly one source per
/// segment, sorted and non-overlapping tracks.
#[derive(Clone, Debug, PartialEq)]
pub struct Playlist {
    tracks: Vec<Track>,
    effects: OrderedMap<EffectBinding>,
    transitions: OrderedMap<Transition>,
    duration: f64,
}

/// An ordered, non-overlapping sequence of segments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    /// Segments sorted by start time.
    pub segments: Vec<Segment>,
}

/// A time-ranged reference to a media source.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Unique id across the playlist.
    pub id: String,
    /// Raw type tag; resolved to a [`SegmentKind`] when the source is instantiated.
    pub type_tag: String,
    /// Timeline start in seconds.
    pub start: f64,
    /// Timeline duration in seconds.
    pub duration: f64,
    /// Offset into the source media where playback begins.
    pub source_start: f64,
    /// Audio volume in `[0, 1]`.
    pub volume: f64,
    /// Surface width for canvas sources.
    pub width: Option<u32>,
    /// Surface height for canvas sources.
    pub height: Option<u32>,
    /// Where the media comes from.
    pub source: SegmentSource,
}

/// Exactly one media origin per segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentSource {
    /// The engine's media factory loads from this URI and owns the resulting element.
    Src(String),
    /// The host supplied an element; the host keeps ownership.
    Element(ElementHandle),
}

/// Closed set of instantiable media kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SegmentKind {
    /// Time-based media with its own clock.
    Video,
    /// Still image.
    Image,
    /// Host-drawn 2D surface.
    Canvas,
}

impl SegmentKind {
    /// Parse a playlist type tag. Unknown tags return `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "video" => Some(Self::Video),
            "image" => Some(Self::Image),
            "canvas" => Some(Self::Canvas),
            _ => None,
        }
    }

    /// Canonical type tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
            Self::Canvas => "canvas",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Concrete shader program definition with defaults filled in.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectDef {
    /// Vertex shader source.
    pub vertex_shader: String,
    /// Fragment shader source.
    pub fragment_shader: String,
    /// Default uniform values.
    pub default_parameters: ParamMap,
}

impl EffectDef {
    /// The pass-through effect used for unbound segments.
    pub fn passthrough() -> Self {
        Self {
            vertex_shader: DEFAULT_VERTEX_SHADER.to_owned(),
            fragment_shader: DEFAULT_FRAGMENT_SHADER.to_owned(),
            default_parameters: ParamMap::new(),
        }
    }

    /// Resolve an authored effect: preset first, then inline overrides.
    pub fn from_spec(spec: &EffectSpecDef) -> Self {
        let mut out = match spec.preset {
            Some(p) => p.definition(),
            None => Self::passthrough(),
        };
        if let Some(v) = &spec.vertex_shader {
            out.vertex_shader = v.clone();
        }
        if let Some(f) = &spec.fragment_shader {
            out.fragment_shader = f.clone();
        }
        overlay(&mut out.default_parameters, &spec.default_parameters);
        out
    }
}

/// Association between one effect and the segments it applies to.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectBinding {
    /// Segment ids this binding applies to.
    pub inputs: Vec<String>,
    /// Shader program and defaults.
    pub effect: EffectDef,
    /// Live parameter overrides.
    pub parameters: ParamMap,
}

impl EffectBinding {
    /// Resolve an authored binding.
    pub fn from_def(def: &EffectBindingDef) -> Self {
        Self {
            inputs: def.inputs.clone(),
            effect: EffectDef::from_spec(&def.effect),
            parameters: def.parameters.clone(),
        }
    }
}

/// A cross-fade window over two or more segments.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Segment ids that must all be playing for the transition to be active.
    pub inputs: SmallVec<[String; 2]>,
}

impl Transition {
    fn from_def(def: &TransitionDef) -> Self {
        Self {
            inputs: def.inputs.iter().cloned().collect(),
        }
    }
}

impl Segment {
    /// Timeline end (`start + duration`).
    pub fn end(&self) -> f64 {
        self.span().end
    }

    /// Half-open timeline window.
    pub fn span(&self) -> TimeSpan {
        TimeSpan::from_start_duration(self.start, self.duration)
    }

    /// Resolve the type tag, failing for tags no factory understands.
    pub fn kind(&self) -> PlaybackResult<SegmentKind> {
        SegmentKind::from_tag(&self.type_tag)
            .ok_or_else(|| PlaybackError::unsupported_type(&self.id, &self.type_tag))
    }

    /// Media-local time for a timeline playhead.
    ///
    /// Inside `[start, end]` the source plays from `source_start` onwards; outside it the
    /// source is parked at `source_start`.
    pub fn source_time_at(&self, playhead: f64) -> f64 {
        let local = playhead - self.start;
        if local < 0.0 || playhead > self.end() {
            self.source_start
        } else {
            local + self.source_start
        }
    }

    /// Fractional progress through the segment (unclamped).
    pub fn progress_at(&self, playhead: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (playhead - self.start) / self.duration
    }

    fn from_def(def: &SegmentDef) -> PlaybackResult<Self> {
        // Only reachable for defs that skipped `validate_playlist`.
        let missing = |field: &str| PlaybackError::serde(format!("segment missing '{field}'"));
        let source = match (&def.src, def.element) {
            (Some(src), None) => SegmentSource::Src(src.clone()),
            (None, Some(el)) => SegmentSource::Element(el),
            _ => return Err(missing("src|element")),
        };
        Ok(Self {
            id: def.id.clone().ok_or_else(|| missing("id"))?,
            type_tag: def.type_tag.clone().ok_or_else(|| missing("type"))?,
            start: def.start.ok_or_else(|| missing("start"))?,
            duration: def.duration.ok_or_else(|| missing("duration"))?,
            source_start: def.source_start.unwrap_or(0.0),
            volume: def.volume.unwrap_or(1.0).clamp(0.0, 1.0),
            width: def.width,
            height: def.height,
            source,
        })
    }
}

impl Track {
    /// Track duration: the latest segment end, or 0 for an empty track.
    pub fn duration(&self) -> f64 {
        self.segments
            .iter()
            .map(Segment::end)
            .fold(0.0, f64::max)
    }

    /// `true` if the track contains a segment with `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.segments.iter().any(|s| s.id == id)
    }
}

impl Playlist {
    /// Validate an authored playlist and convert it into the runtime model.
    pub fn from_def(def: &PlaylistDef) -> PlaybackResult<Self> {
        validate_playlist(def)?;

        let tracks = def
            .tracks
            .iter()
            .map(|t| {
                Ok(Track {
                    segments: t
                        .iter()
                        .map(Segment::from_def)
                        .collect::<PlaybackResult<Vec<_>>>()?,
                })
            })
            .collect::<PlaybackResult<Vec<_>>>()?;
        let effects = def
            .effects
            .iter()
            .map(|(k, b)| (k, EffectBinding::from_def(b)))
            .collect();
        let transitions = def
            .transitions
            .iter()
            .map(|(k, t)| (k, Transition::from_def(t)))
            .collect();

        let duration = tracks.iter().map(Track::duration).fold(0.0, f64::max);
        Ok(Self {
            tracks,
            effects,
            transitions,
            duration,
        })
    }

    /// Parse JSON, validate, and convert.
    pub fn from_json_str(s: &str) -> PlaybackResult<Self> {
        Self::from_def(&PlaylistDef::from_json_str(s)?)
    }

    /// Tracks in draw-priority order (track 0 on top).
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Effect bindings in declaration order.
    pub fn effects(&self) -> &OrderedMap<EffectBinding> {
        &self.effects
    }

    /// Transitions in declaration order.
    pub fn transitions(&self) -> &OrderedMap<Transition> {
        &self.transitions
    }

    /// Playlist duration: the longest track duration.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// All segments with their track index, in track then segment order.
    pub fn segments(&self) -> impl Iterator<Item = (usize, &Segment)> {
        self.tracks
            .iter()
            .enumerate()
            .flat_map(|(ti, t)| t.segments.iter().map(move |s| (ti, s)))
    }

    /// Look up a segment by id.
    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments().map(|(_, s)| s).find(|s| s.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playlist/model.rs"]
mod tests;
