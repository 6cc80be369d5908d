//! Pure selectors over a snapshot of the item mapping.

use std::collections::BTreeSet;

use crate::id::{ItemId, ItemKind};
use crate::model::item::{Item, Items};

/// All items in canonical ID order.
#[must_use]
pub fn select_all_items(items: &Items) -> Vec<&Item> {
    items.values().collect()
}

/// All items of one kind, by ascending serial.
#[must_use]
pub fn select_items_of_kind(items: &Items, kind: ItemKind) -> Vec<&Item> {
    items.values().filter(|item| item.kind() == kind).collect()
}

/// Distinct tags across all items, sorted.
#[must_use]
pub fn select_all_tags(items: &Items) -> Vec<String> {
    items
        .values()
        .flat_map(|item| item.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct person names (comment authors and decision deciders), sorted.
#[must_use]
pub fn select_all_person_names(items: &Items) -> Vec<String> {
    items
        .values()
        .flat_map(Item::person_names)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The identifier the next item of `kind` receives: highest existing serial
/// of that kind plus one, or 1 if there is none. `None` once the highest
/// serial is `u32::MAX`.
#[must_use]
pub fn next_item_id(items: &Items, kind: ItemKind) -> Option<ItemId> {
    let highest = items
        .keys()
        .filter(|id| id.kind() == kind)
        .map(|id| id.serial())
        .max()
        .unwrap_or(0);
    highest
        .checked_add(1)
        .and_then(|serial| ItemId::new(kind, serial))
}
