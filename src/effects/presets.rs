use std::fmt;
use std::str::FromStr;

use crate::{
    effects::params::{ParamMap, ParamValue},
    effects::shaders,
    foundation::error::{PlaybackError, PlaybackResult},
    playlist::model::EffectDef,
};

/// Built-in effect definitions addressable by name from playlist JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectPreset {
    /// Scale and offset the source quad (`scaleX`, `scaleY`, `offsetX`, `offsetY`).
    OffsetScale,
    /// Luma-weighted greyscale.
    Monochrome,
    /// Warm-tinted greyscale.
    Sepia,
    /// Reduce colour depth to 3 bits per channel.
    BitCrunch,
    /// Chroma key on green within a luma band (`yLowerThreshold`, `yUpperThreshold`).
    GreenScreen,
    /// Alpha fade over `inTime` seconds in and `outTime` seconds out (1s / 1s).
    FadeInOut,
    /// Fade in and out over two seconds each.
    FadeInOut2Sec,
    /// One-second fade in only.
    FadeIn1Sec,
    /// Two-second fade in only.
    FadeIn2Sec,
    /// One-second fade out only.
    FadeOut1Sec,
    /// Two-second fade out only.
    FadeOut2Sec,
    /// Letterbox the source into the output without distortion.
    PreserveAspectRatio,
}

impl EffectPreset {
    /// All presets, in declaration order.
    pub const ALL: [EffectPreset; 12] = [
        Self::OffsetScale,
        Self::Monochrome,
        Self::Sepia,
        Self::BitCrunch,
        Self::GreenScreen,
        Self::FadeInOut,
        Self::FadeInOut2Sec,
        Self::FadeIn1Sec,
        Self::FadeIn2Sec,
        Self::FadeOut1Sec,
        Self::FadeOut2Sec,
        Self::PreserveAspectRatio,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::OffsetScale => "offset_scale",
            Self::Monochrome => "monochrome",
            Self::Sepia => "sepia",
            Self::BitCrunch => "bitcrunch",
            Self::GreenScreen => "greenscreen",
            Self::FadeInOut => "fade_in_out",
            Self::FadeInOut2Sec => "fade_in_out_2sec",
            Self::FadeIn1Sec => "fade_in_1sec",
            Self::FadeIn2Sec => "fade_in_2sec",
            Self::FadeOut1Sec => "fade_out_1sec",
            Self::FadeOut2Sec => "fade_out_2sec",
            Self::PreserveAspectRatio => "preserve_aspect_ratio",
        }
    }

    /// Concrete effect definition for this preset.
    pub fn definition(self) -> EffectDef {
        let def = |vertex: &str, fragment: &str, params: &[(&str, f64)]| EffectDef {
            vertex_shader: vertex.to_owned(),
            fragment_shader: fragment.to_owned(),
            default_parameters: params
                .iter()
                .map(|(k, v)| ((*k).to_owned(), ParamValue::Number(*v)))
                .collect::<ParamMap>(),
        };
        let fade = |in_time: f64, out_time: f64| {
            def(
                shaders::IN_OUT_VERTEX_SHADER,
                shaders::FADE_IN_OUT_FRAGMENT_SHADER,
                &[("inTime", in_time), ("outTime", out_time)],
            )
        };

        match self {
            Self::OffsetScale => def(
                shaders::OFFSET_SCALE_VERTEX_SHADER,
                shaders::DEFAULT_FRAGMENT_SHADER,
                &[
                    ("scaleX", 1.0),
                    ("scaleY", 1.0),
                    ("offsetX", 0.0),
                    ("offsetY", 0.0),
                ],
            ),
            Self::Monochrome => def(
                shaders::DEFAULT_VERTEX_SHADER,
                shaders::MONOCHROME_FRAGMENT_SHADER,
                &[],
            ),
            Self::Sepia => def(
                shaders::DEFAULT_VERTEX_SHADER,
                shaders::SEPIA_FRAGMENT_SHADER,
                &[],
            ),
            Self::BitCrunch => def(
                shaders::DEFAULT_VERTEX_SHADER,
                shaders::BITCRUNCH_FRAGMENT_SHADER,
                &[],
            ),
            Self::GreenScreen => def(
                shaders::GREEN_SCREEN_VERTEX_SHADER,
                shaders::GREEN_SCREEN_FRAGMENT_SHADER,
                &[("yLowerThreshold", 0.2), ("yUpperThreshold", 0.8)],
            ),
            Self::FadeInOut => fade(1.0, 1.0),
            Self::FadeInOut2Sec => fade(2.0, 2.0),
            Self::FadeIn1Sec => fade(1.0, 0.0),
            Self::FadeIn2Sec => fade(2.0, 0.0),
            Self::FadeOut1Sec => fade(0.0, 1.0),
            Self::FadeOut2Sec => fade(0.0, 2.0),
            Self::PreserveAspectRatio => def(
                shaders::DEFAULT_VERTEX_SHADER,
                shaders::PRESERVE_ASPECT_RATIO_FRAGMENT_SHADER,
                &[],
            ),
        }
    }
}

impl fmt::Display for EffectPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectPreset {
    type Err = PlaybackError;

    fn from_str(s: &str) -> PlaybackResult<Self> {
        // Accept `FADEINOUT1SEC`, `fade_in_out_1sec` and `fade-in-out-1sec` alike.
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let preset = match folded.as_str() {
            "offsetscale" => Self::OffsetScale,
            "monochrome" => Self::Monochrome,
            "sepia" => Self::Sepia,
            "bitcrunch" => Self::BitCrunch,
            "greenscreen" => Self::GreenScreen,
            "fadeinout" | "fadeinout1sec" => Self::FadeInOut,
            "fadeinout2sec" => Self::FadeInOut2Sec,
            "fadein1sec" => Self::FadeIn1Sec,
            "fadein2sec" => Self::FadeIn2Sec,
            "fadeout1sec" => Self::FadeOut1Sec,
            "fadeout2sec" => Self::FadeOut2Sec,
            "preserveaspectratio" => Self::PreserveAspectRatio,
            _ => {
                return Err(PlaybackError::serde(format!(
                    "unknown effect preset '{}'",
                    s.trim()
                )));
            }
        };
        Ok(preset)
    }
}

impl serde::Serialize for EffectPreset {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> serde::Deserialize<'de> for EffectPreset {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/presets.rs"]
mod tests;
