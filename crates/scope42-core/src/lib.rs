#![forbid(unsafe_code)]
//! scope42-core library.
//!
//! # Conventions
//!
//! - **Errors**: library errors are `thiserror` enums that map to a stable
//!   [`error::ErrorCode`]; config helpers return `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod graph;
pub mod id;
pub mod lock;
pub mod model;
pub mod persistence;
pub mod search;
pub mod selectors;
pub mod store;

pub use id::{ItemId, ItemKind};
pub use model::item::{Item, Items, NewItem};
pub use store::{Store, WorkspaceState};
