//! Domain model: items, their kind-specific details and lifecycle statuses.

pub mod item;
pub mod status;
