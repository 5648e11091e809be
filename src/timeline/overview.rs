//! Timeline overview geometry.
//!
//! Produces rectangles for a host to paint; nothing here rasterizes.

use kurbo::{Rect, Size};

use crate::playlist::model::{Playlist, SegmentKind};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

const PLAYHEAD_COLOR: Rgba8 = Rgba8::opaque(0xff, 0x00, 0x00);
const UNKNOWN_COLOR: Rgba8 = Rgba8::opaque(0x80, 0x80, 0x80);

fn kind_colors(kind: SegmentKind) -> [Rgba8; 2] {
    match kind {
        SegmentKind::Video => [
            Rgba8::opaque(0x57, 0x2a, 0x72),
            Rgba8::opaque(0x3c, 0x12, 0x55),
        ],
        SegmentKind::Image => [
            Rgba8::opaque(0x7d, 0x9f, 0x35),
            Rgba8::opaque(0x57, 0x77, 0x14),
        ],
        SegmentKind::Canvas => [
            Rgba8::opaque(0xaa, 0x96, 0x39),
            Rgba8::opaque(0x80, 0x6d, 0x15),
        ],
    }
}

/// One painted block in the overview.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct OverviewBlock {
    /// Segment id.
    pub id: String,
    /// Track row.
    pub track_index: usize,
    /// Block bounds in overview pixels.
    pub rect: Rect,
    /// Fill color.
    pub color: Rgba8,
}

/// Laid-out timeline overview.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelineOverview {
    /// Overall size the layout was computed for.
    pub size: Size,
    /// Segment blocks in track then segment order.
    pub blocks: Vec<OverviewBlock>,
    /// Playhead marker, when a playhead was given and lies within the playlist.
    pub playhead: Option<Rect>,
}

/// Lay out `playlist` into `size`: x is proportional to time, one row per track.
///
/// An empty playlist (zero duration) produces no blocks.
pub fn timeline_overview(playlist: &Playlist, size: Size, playhead: Option<f64>) -> TimelineOverview {
    let duration = playlist.duration();
    let rows = playlist.tracks().len();
    if duration <= 0.0 || rows == 0 {
        return TimelineOverview {
            size,
            blocks: Vec::new(),
            playhead: None,
        };
    }

    let px_per_sec = size.width / duration;
    let row_height = size.height / rows as f64;

    let mut blocks = Vec::new();
    for (track_index, track) in playlist.tracks().iter().enumerate() {
        let y0 = row_height * track_index as f64;
        for (i, seg) in track.segments.iter().enumerate() {
            let color = seg
                .kind()
                .map(|k| kind_colors(k)[i % 2])
                .unwrap_or(UNKNOWN_COLOR);
            blocks.push(OverviewBlock {
                id: seg.id.clone(),
                track_index,
                rect: Rect::new(
                    seg.start * px_per_sec,
                    y0,
                    seg.end() * px_per_sec,
                    y0 + row_height,
                ),
                color,
            });
        }
    }

    let playhead = playhead
        .filter(|t| (0.0..=duration).contains(t))
        .map(|t| {
            let x = t * px_per_sec;
            Rect::new(x, 0.0, x + 1.0, size.height)
        });

    TimelineOverview {
        size,
        blocks,
        playhead,
    }
}

impl TimelineOverview {
    /// Playhead marker color.
    pub fn playhead_color(&self) -> Rgba8 {
        PLAYHEAD_COLOR
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/overview.rs"]
mod tests;
