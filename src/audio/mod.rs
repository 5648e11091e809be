//! Optional audio routing.

/// Router capability and per-track bus management.
pub mod routing;
