#![forbid(unsafe_code)]
//! scope42-search library.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod index;
pub mod query;

pub use index::{SearchHit, SearchIndex};
