//! Effect definitions, presets and per-segment resolution.

/// Shader parameter values.
pub mod params;
/// Built-in effect library.
pub mod presets;
/// Effect identity and the program cache.
pub mod program;
/// Segment-to-effect resolution and parameter merging.
pub mod resolver;
/// GLSL sources.
pub mod shaders;
