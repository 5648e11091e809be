//! Media source capability, factories and the instance lifecycle.

/// Source factories keyed by segment kind.
pub mod factory;
/// In-memory sources for tests and simulation.
pub mod headless;
/// Live instance ownership: preload, retire, readiness gate, seek.
pub mod lifecycle;
/// Per-segment listener hooks.
pub mod listener;
/// The media source trait.
pub mod source;
