//! Playhead classification and timeline overview geometry.

/// Segment partition at a playhead.
pub mod classify;
/// Overview layout.
pub mod overview;
