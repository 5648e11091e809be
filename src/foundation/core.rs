/// Pixel dimensions of a source or output surface.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Construct a resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Resolution as a float pair, the shape shaders consume.
    pub fn as_vec2(self) -> [f64; 2] {
        [f64::from(self.width), f64::from(self.height)]
    }
}

/// Opaque host-side media element supplied in place of a `src` URI.
///
/// The engine never dereferences it; media factories map it back to whatever the host owns.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ElementHandle(pub u64);

/// Renderer-issued handle to a linked shader program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// Reference to a texture parameter, resolved by the renderer at draw time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TextureRef {
    /// Host-defined texture key (image URI, element key, LUT name).
    pub texture: String,
}

impl TextureRef {
    /// Construct a texture reference.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            texture: key.into(),
        }
    }
}

/// Audio-router handle to a per-track output bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BusHandle(pub u64);

/// Audio-router handle to a media element's audio node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AudioNodeHandle(pub u64);

/// Half-open time window `[start, end)` in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeSpan {
    /// Inclusive start.
    pub start: f64,
    /// Exclusive end.
    pub end: f64,
}

impl TimeSpan {
    /// Window starting at `start` and lasting `duration` seconds.
    pub fn from_start_duration(start: f64, duration: f64) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    /// Window length in seconds (never negative).
    pub fn len(self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// `true` when the window has no extent.
    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }

    /// Half-open containment check.
    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}
