//! Cross-fade windows over overlapping segments.

/// Active transitions and overlap progress.
pub mod overlap;
