//! Renderer capability and the in-memory backend.

/// Recording renderer for tests and simulation.
pub mod headless;
/// Renderer trait and draw-call shape.
pub mod renderer;
