//! Playlist schema, validation and builders.

/// Authored (boundary) form.
pub mod def;
/// Builder helpers.
pub mod dsl;
/// Validated runtime model.
pub mod model;
/// Structural validation.
pub mod validate;
