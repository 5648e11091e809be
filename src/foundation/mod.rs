//! Shared primitives and errors.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod ordered;
