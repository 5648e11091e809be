use crate::playlist::model::{Playlist, Segment};

/// A segment reference paired with the index of the track that holds it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedSegment<'a> {
    /// Owning track index (0 is drawn on top).
    pub track_index: usize,
    /// The segment.
    pub segment: &'a Segment,
}

/// Partition of every playlist segment relative to one playhead.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification<'a> {
    /// Segments starting after the playhead, earliest first.
    pub to_play: Vec<TrackedSegment<'a>>,
    /// Segments whose half-open window contains the playhead, in track order.
    pub currently_playing: Vec<TrackedSegment<'a>>,
    /// Segments that ended at or before the playhead.
    pub finished: Vec<TrackedSegment<'a>>,
}

impl Classification<'_> {
    /// `true` when nothing is left to play or playing.
    pub fn is_exhausted(&self) -> bool {
        self.to_play.is_empty() && self.currently_playing.is_empty()
    }

    /// `true` if `id` is currently playing.
    pub fn is_playing(&self, id: &str) -> bool {
        self.currently_playing.iter().any(|t| t.segment.id == id)
    }

    /// Total number of classified segments.
    pub fn len(&self) -> usize {
        self.to_play.len() + self.currently_playing.len() + self.finished.len()
    }

    /// `true` for an empty playlist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where a segment sits relative to a playhead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentPhase {
    /// `playhead < start`.
    ToPlay,
    /// `start <= playhead < end`.
    Playing,
    /// `playhead >= end`.
    Finished,
}

/// Phase of `segment` at `playhead` under the half-open `[start, end)` policy.
///
/// Zero-duration segments go straight from `ToPlay` to `Finished`.
pub fn phase_at(segment: &Segment, playhead: f64) -> SegmentPhase {
    let span = segment.span();
    if span.contains(playhead) {
        SegmentPhase::Playing
    } else if playhead >= span.end {
        SegmentPhase::Finished
    } else {
        SegmentPhase::ToPlay
    }
}

/// Partition all segments of `playlist` into to-play, currently-playing and finished.
#[tracing::instrument(skip(playlist))]
pub fn classify(playlist: &Playlist, playhead: f64) -> Classification<'_> {
    let mut out = Classification::default();
    for (track_index, segment) in playlist.segments() {
        let entry = TrackedSegment {
            track_index,
            segment,
        };
        match phase_at(segment, playhead) {
            SegmentPhase::ToPlay => out.to_play.push(entry),
            SegmentPhase::Playing => out.currently_playing.push(entry),
            SegmentPhase::Finished => out.finished.push(entry),
        }
    }
    // Stable: equal starts keep track order.
    out.to_play
        .sort_by(|a, b| a.segment.start.total_cmp(&b.segment.start));
    out
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/classify.rs"]
mod tests;
