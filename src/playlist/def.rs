use crate::{
    effects::params::ParamMap,
    effects::presets::EffectPreset,
    foundation::core::ElementHandle,
    foundation::error::{PlaybackError, PlaybackResult},
    foundation::ordered::OrderedMap,
};

/// Boundary form of a playlist, exactly as authored.
///
/// Every segment field is optional here so that a missing field surfaces as a structured
/// validation error instead of a generic deserialization failure. Convert into a
/// [`Playlist`](crate::Playlist) with [`Playlist::from_def`](crate::Playlist::from_def).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlaylistDef {
    /// Tracks, each an ordered array of segments. Track 0 is drawn on top.
    #[serde(default)]
    pub tracks: Vec<Vec<SegmentDef>>,
    /// Effect bindings keyed by binding id, in declaration order.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub effects: OrderedMap<EffectBindingDef>,
    /// Transitions keyed by transition id, in declaration order.
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub transitions: OrderedMap<TransitionDef>,
}

impl PlaylistDef {
    /// Parse a playlist from JSON text.
    pub fn from_json_str(s: &str) -> PlaybackResult<Self> {
        serde_json::from_str(s).map_err(|e| PlaybackError::serde(e.to_string()))
    }
}

/// Boundary form of a segment (a media-source reference).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDef {
    /// Unique id across the playlist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Media type tag: `video`, `image` or `canvas`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    /// Timeline start in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    /// Timeline duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Offset into the source media where playback begins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_start: Option<f64>,
    /// Audio volume in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Surface width for canvas sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Surface height for canvas sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Media URI. Mutually exclusive with `element`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Host-owned element. Mutually exclusive with `src`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementHandle>,
}

impl SegmentDef {
    fn timed(id: &str, type_tag: &str, start: f64, duration: f64) -> Self {
        Self {
            id: Some(id.to_owned()),
            type_tag: Some(type_tag.to_owned()),
            start: Some(start),
            duration: Some(duration),
            ..Self::default()
        }
    }

    /// Video segment skeleton (no source yet).
    pub fn video(id: &str, start: f64, duration: f64) -> Self {
        Self::timed(id, "video", start, duration)
    }

    /// Image segment skeleton (no source yet).
    pub fn image(id: &str, start: f64, duration: f64) -> Self {
        Self::timed(id, "image", start, duration)
    }

    /// Canvas segment skeleton (no source yet).
    pub fn canvas(id: &str, start: f64, duration: f64) -> Self {
        Self::timed(id, "canvas", start, duration)
    }

    /// Set the media URI.
    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Set the host element handle.
    pub fn with_element(mut self, element: ElementHandle) -> Self {
        self.element = Some(element);
        self
    }

    /// Set the source-media offset.
    pub fn with_source_start(mut self, source_start: f64) -> Self {
        self.source_start = Some(source_start);
        self
    }

    /// Set the audio volume.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Set canvas surface size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// Boundary form of an effect binding.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectBindingDef {
    /// Segment ids this binding applies to.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Shader program and its default parameters.
    #[serde(default)]
    pub effect: EffectSpecDef,
    /// Live parameter overrides.
    #[serde(default, skip_serializing_if = "ParamMap::is_empty")]
    pub parameters: ParamMap,
}

/// Boundary form of an effect: either inline shaders, a named preset, or a preset with
/// selected fields overridden.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectSpecDef {
    /// Built-in preset to start from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<EffectPreset>,
    /// Vertex shader source; falls back to the preset or pass-through shader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex_shader: Option<String>,
    /// Fragment shader source; falls back to the preset or pass-through shader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment_shader: Option<String>,
    /// Default uniform values, layered over the preset's defaults.
    #[serde(default, skip_serializing_if = "ParamMap::is_empty")]
    pub default_parameters: ParamMap,
}

/// Boundary form of a transition.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionDef {
    /// Segment ids that must all be playing for the transition to be active.
    #[serde(default)]
    pub inputs: Vec<String>,
}
