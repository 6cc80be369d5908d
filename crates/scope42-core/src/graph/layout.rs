//! Preset radial layout.
//!
//! Force-directed layout belongs to the rendering engine. For sinks that
//! cannot run one (static exports, previews) this places the first node at
//! the origin and spreads the remaining nodes evenly on a circle.

use std::f64::consts::PI;

use serde::Serialize;

use super::build::GraphElements;

/// Canvas edge length the radius is derived from.
pub const DEFAULT_CANVAS_SIZE: f64 = 600.0;

/// Space reserved between the ring and the canvas border for labels.
const LABEL_MARGIN: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Positions keyed by node ID, in node order.
#[must_use]
pub fn radial_layout(elements: &GraphElements, canvas_size: f64) -> Vec<(String, Position)> {
    let Some((center, ring)) = elements.nodes.split_first() else {
        return Vec::new();
    };

    let radius = (canvas_size / 2.0 - LABEL_MARGIN).max(0.0);
    #[allow(clippy::cast_precision_loss)]
    let count = ring.len() as f64;

    let mut positions = Vec::with_capacity(elements.nodes.len());
    positions.push((center.id.clone(), Position { x: 0.0, y: 0.0 }));
    for (index, node) in ring.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let angle = 2.0 * PI * index as f64 / count;
        positions.push((
            node.id.clone(),
            Position {
                x: radius * angle.cos(),
                y: radius * angle.sin(),
            },
        ));
    }
    positions
}
