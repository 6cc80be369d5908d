//! Seam between the store and a full-text search index.

use crate::model::item::Item;

/// Receives item changes for indexing.
///
/// Calls are fire-and-forget: implementations must not block the caller on
/// indexing work and report their own failures through logging.
pub trait SearchSink: Send {
    fn add(&self, item: &Item);
    fn update(&self, item: &Item);
    /// Drop everything indexed so far.
    fn reset(&self);
}

/// Sink that indexes nothing. Used when search is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSearch;

impl SearchSink for NoopSearch {
    fn add(&self, _item: &Item) {}

    fn update(&self, _item: &Item) {}

    fn reset(&self) {}
}
