use crate::foundation::error::{PlaybackError, PlaybackResult};

/// Compositor tuning knobs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositorOpts {
    /// How far ahead of the playhead upcoming segments are created and loaded, in seconds.
    pub preload_lookahead_sec: f64,
    /// How long finished segments keep their instance after ending, in seconds.
    pub post_play_retention_sec: f64,
    /// Timeline seconds per wall-clock second. `0` freezes time but keeps rendering.
    pub playback_rate: f64,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            preload_lookahead_sec: 10.0,
            post_play_retention_sec: 0.0,
            playback_rate: 1.0,
        }
    }
}

impl CompositorOpts {
    /// Reject non-finite or negative values.
    pub fn validate(&self) -> PlaybackResult<()> {
        for (name, v) in [
            ("preload_lookahead_sec", self.preload_lookahead_sec),
            ("post_play_retention_sec", self.post_play_retention_sec),
            ("playback_rate", self.playback_rate),
        ] {
            if !v.is_finite() {
                return Err(PlaybackError::config(format!("{name} must be finite")));
            }
            if v < 0.0 {
                return Err(PlaybackError::config(format!("{name} must be >= 0")));
            }
        }
        Ok(())
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> PlaybackResult<Self> {
        let opts: Self = serde_json::from_str(s).map_err(|e| PlaybackError::serde(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }
}
