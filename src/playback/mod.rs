//! Transport: compositor, events, options and the shared tick scheduler.

/// The per-playlist driver.
pub mod compositor;
/// Transport events and listener registration.
pub mod events;
/// Compositor options.
pub mod opts;
/// Wall-clock scheduler for many compositors.
pub mod scheduler;
