//! Relationship graph derivation.
//!
//! Relations are never stored; they are derived from the reference fields
//! of items every time they are needed. This module turns an item pool into
//! relations and relations into node/edge lists for a layout engine.
//!
//! ## Submodules
//!
//! - [`relation`]: outgoing/incoming relations of one item within a pool.
//! - [`build`]: node/edge list construction around focal items.
//! - [`layout`]: preset radial positions for callers without a layout engine.

pub mod build;
pub mod layout;
pub mod relation;

pub use build::{GraphEdge, GraphElements, GraphNode, GraphOptions, build_graph};
pub use relation::{ItemPool, Relation, incoming_relations, outgoing_relations};
