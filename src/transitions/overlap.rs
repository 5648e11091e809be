use smallvec::SmallVec;

use crate::{playlist::model::Playlist, timeline::classify::Classification};

/// A declared transition whose inputs are all playing at the current playhead.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ActiveTransition {
    /// Transition id.
    pub id: String,
    /// Input segment ids in declaration order.
    pub inputs: SmallVec<[String; 2]>,
    /// Latest input start.
    pub overlap_start: f64,
    /// Earliest input end.
    pub overlap_end: f64,
    /// Progress through the overlap window (unclamped).
    pub progress: f64,
}

impl ActiveTransition {
    /// Progress clamped to `[0, 1]`.
    pub fn clamped_progress(&self) -> f64 {
        self.progress.clamp(0.0, 1.0)
    }

    /// Position of `segment_id` within the transition inputs.
    pub fn input_index(&self, segment_id: &str) -> Option<usize> {
        self.inputs.iter().position(|i| i == segment_id)
    }
}

/// Progress through `[overlap_start, overlap_end]` at `playhead`.
///
/// An empty window reports 1.0 once the playhead has reached its end and 0.0 before.
pub fn overlap_progress(overlap_start: f64, overlap_end: f64, playhead: f64) -> f64 {
    if overlap_end <= overlap_start {
        return if playhead >= overlap_end { 1.0 } else { 0.0 };
    }
    (playhead - overlap_start) / (overlap_end - overlap_start)
}

/// Transitions active under `classification`, in declaration order.
///
/// A transition is active when every input is currently playing. Transitions with no inputs
/// are never active.
pub fn active_transitions(
    playlist: &Playlist,
    classification: &Classification<'_>,
    playhead: f64,
) -> Vec<ActiveTransition> {
    let mut out = Vec::new();
    'transitions: for (id, transition) in playlist.transitions().iter() {
        if transition.inputs.is_empty() {
            continue;
        }
        let mut overlap_start = f64::NEG_INFINITY;
        let mut overlap_end = f64::INFINITY;
        for input in &transition.inputs {
            let Some(playing) = classification
                .currently_playing
                .iter()
                .find(|t| t.segment.id == *input)
            else {
                continue 'transitions;
            };
            overlap_start = overlap_start.max(playing.segment.start);
            overlap_end = overlap_end.min(playing.segment.end());
        }
        out.push(ActiveTransition {
            id: id.to_owned(),
            inputs: transition.inputs.clone(),
            overlap_start,
            overlap_end,
            progress: overlap_progress(overlap_start, overlap_end, playhead),
        });
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/transitions/overlap.rs"]
mod tests;
