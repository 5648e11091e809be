use crate::{
    effects::params::{ParamMap, ParamValue},
    effects::presets::EffectPreset,
    foundation::error::PlaybackResult,
    playlist::def::{EffectBindingDef, EffectSpecDef, PlaylistDef, SegmentDef, TransitionDef},
    playlist::model::Playlist,
};

/// Builder for [`Playlist`](crate::Playlist).
#[derive(Default)]
pub struct PlaylistBuilder {
    def: PlaylistDef,
}

impl PlaylistBuilder {
    /// Start an empty playlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track.
    pub fn track(mut self, segments: impl IntoIterator<Item = SegmentDef>) -> Self {
        self.def.tracks.push(segments.into_iter().collect());
        self
    }

    /// Add (or replace) an effect binding.
    pub fn effect(mut self, id: impl Into<String>, binding: EffectBindingDef) -> Self {
        self.def.effects.insert(id, binding);
        self
    }

    /// Add (or replace) a transition over `inputs`.
    pub fn transition<I, S>(mut self, id: impl Into<String>, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.def.transitions.insert(
            id,
            TransitionDef {
                inputs: inputs.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    /// Authored form, without validation.
    pub fn into_def(self) -> PlaylistDef {
        self.def
    }

    /// Validate and build the final [`Playlist`](crate::Playlist).
    pub fn build(self) -> PlaybackResult<Playlist> {
        Playlist::from_def(&self.def)
    }
}

/// Binding of a built-in preset to `inputs`.
pub fn preset_binding<I, S>(preset: EffectPreset, inputs: I) -> EffectBindingDef
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EffectBindingDef {
        inputs: inputs.into_iter().map(Into::into).collect(),
        effect: EffectSpecDef {
            preset: Some(preset),
            ..EffectSpecDef::default()
        },
        parameters: ParamMap::new(),
    }
}

/// Binding of an inline fragment shader to `inputs`, using the pass-through vertex shader.
pub fn shader_binding<I, S>(fragment_shader: impl Into<String>, inputs: I) -> EffectBindingDef
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EffectBindingDef {
        inputs: inputs.into_iter().map(Into::into).collect(),
        effect: EffectSpecDef {
            fragment_shader: Some(fragment_shader.into()),
            ..EffectSpecDef::default()
        },
        parameters: ParamMap::new(),
    }
}

impl EffectBindingDef {
    /// Set a live parameter override.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Set an effect default parameter.
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.effect
            .default_parameters
            .insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playlist/dsl.rs"]
mod tests;
