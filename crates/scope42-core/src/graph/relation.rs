//! Derived relations between items.
//!
//! # Direction
//!
//! An *outgoing* relation is a reference the item itself makes (an issue's
//! `causes` list). An *incoming* relation is a reference some other item in
//! the pool makes to it, discovered by scanning the pool; it carries the
//! inverse label (`caused by`, `solved by`, ...).
//!
//! References whose target does not resolve in the pool are skipped, so a
//! relation always points at an item the caller can render.

use std::collections::BTreeMap;

use tracing::trace;

use crate::id::ItemId;
use crate::model::item::{Item, RelationKind};

/// A set of items relations may resolve against.
///
/// Implemented for the owned item mapping and for borrowed views of it, so
/// the graph builder can restrict lookups to a subset without cloning items.
pub trait ItemPool {
    fn lookup(&self, id: ItemId) -> Option<&Item>;

    /// Every item in the pool, in canonical [`ItemId`] order.
    fn pool_items(&self) -> Box<dyn Iterator<Item = &Item> + '_>;
}

impl ItemPool for BTreeMap<ItemId, Item> {
    fn lookup(&self, id: ItemId) -> Option<&Item> {
        self.get(&id)
    }

    fn pool_items(&self) -> Box<dyn Iterator<Item = &Item> + '_> {
        Box::new(self.values())
    }
}

impl ItemPool for BTreeMap<ItemId, &Item> {
    fn lookup(&self, id: ItemId) -> Option<&Item> {
        self.get(&id).copied()
    }

    fn pool_items(&self) -> Box<dyn Iterator<Item = &Item> + '_> {
        Box::new(self.values().copied())
    }
}

/// A directed, labeled association from the item being inspected to `item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation<'a> {
    pub item: &'a Item,
    pub kind: RelationKind,
    pub label: &'static str,
}

/// References `item` makes to other items present in `pool`.
///
/// Ordered by reference field, then by position within the field. A
/// self-reference resolves to the item's own pool entry.
pub fn outgoing_relations<'p, P: ItemPool + ?Sized>(item: &Item, pool: &'p P) -> Vec<Relation<'p>> {
    item.references()
        .into_iter()
        .filter_map(|(kind, target)| match pool.lookup(target) {
            Some(found) => Some(Relation {
                item: found,
                kind,
                label: kind.label(),
            }),
            None => {
                trace!(source = %item.id, target = %target, "skipping unresolved reference");
                None
            }
        })
        .collect()
}

/// References other items in `pool` make to `item`, labeled from `item`'s
/// point of view.
///
/// Ordered by the referencing item's ID, then by its field order.
pub fn incoming_relations<'p, P: ItemPool + ?Sized>(item: &Item, pool: &'p P) -> Vec<Relation<'p>> {
    let mut relations = Vec::new();
    for candidate in pool.pool_items() {
        for (kind, target) in candidate.references() {
            if target == item.id {
                relations.push(Relation {
                    item: candidate,
                    kind,
                    label: kind.inverse_label(),
                });
            }
        }
    }
    relations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{Details, ImprovementDetails, IssueDetails, Items, NewItem};

    fn id(raw: &str) -> ItemId {
        raw.parse().expect("valid id")
    }

    fn pool(items: Vec<Item>) -> Items {
        items.into_iter().map(|item| (item.id, item)).collect()
    }

    fn issue(raw: &str, causes: &[&str]) -> Item {
        NewItem::new(
            raw,
            Details::Issue(IssueDetails {
                causes: causes.iter().map(|c| id(c)).collect(),
                ..IssueDetails::default()
            }),
        )
        .into_item(id(raw))
    }

    fn improvement(raw: &str, solves: &[&str]) -> Item {
        NewItem::new(
            raw,
            Details::Improvement(ImprovementDetails {
                solves: solves.iter().map(|c| id(c)).collect(),
                ..ImprovementDetails::default()
            }),
        )
        .into_item(id(raw))
    }

    #[test]
    fn outgoing_skips_targets_missing_from_pool() {
        let items = pool(vec![issue("issue-1", &["issue-2", "risk-9"]), issue("issue-2", &[])]);
        let source = &items[&id("issue-1")];

        let relations = outgoing_relations(source, &items);
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].item.id, id("issue-2"));
        assert_eq!(relations[0].label, "causes");
    }

    #[test]
    fn incoming_scans_pool_and_uses_inverse_labels() {
        let items = pool(vec![
            issue("issue-1", &[]),
            issue("issue-2", &["issue-1"]),
            improvement("improvement-1", &["issue-1"]),
        ]);
        let target = &items[&id("issue-1")];

        let relations = incoming_relations(target, &items);
        let seen: Vec<(String, &str)> = relations
            .iter()
            .map(|r| (r.item.id.to_string(), r.label))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("issue-2".to_string(), "caused by"),
                ("improvement-1".to_string(), "solved by"),
            ]
        );
    }

    #[test]
    fn restricted_pool_hides_items_outside_it() {
        let items = pool(vec![issue("issue-1", &["issue-2"]), issue("issue-2", &[])]);
        let restricted: BTreeMap<ItemId, &Item> =
            std::iter::once((id("issue-1"), &items[&id("issue-1")])).collect();

        assert!(outgoing_relations(&items[&id("issue-1")], &restricted).is_empty());
    }

    #[test]
    fn self_reference_is_both_outgoing_and_incoming() {
        let items = pool(vec![issue("issue-1", &["issue-1"])]);
        let item = &items[&id("issue-1")];

        assert_eq!(outgoing_relations(item, &items).len(), 1);
        assert_eq!(incoming_relations(item, &items).len(), 1);
    }
}
