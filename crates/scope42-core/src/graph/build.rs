//! Node/edge list construction for relationship graphs.
//!
//! # Overview
//!
//! [`build_graph`] takes the focal items of a rendering request and the item
//! pool and returns a [`GraphElements`] value: a deduplicated node list and
//! a labeled, directed edge list ready for a force-directed layout engine.
//!
//! ## Algorithm
//!
//! 1. Nodes start as the focal items, deduplicated by ID in first-seen order.
//! 2. With [`GraphOptions::include_related`], the targets of every focal
//!    item's outgoing relations and the sources of its incoming relations
//!    are appended, again skipping IDs already present.
//! 3. Edges are derived from outgoing relations only, resolved against a
//!    lookup restricted to the displayed items. A reference to anything not
//!    displayed never becomes an edge, so there are no dangling endpoints.
//!
//! The result is a pure function of its inputs. Call it again whenever the
//! focal set or the item mapping changes; there is no incremental update.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::relation::{ItemPool, incoming_relations, outgoing_relations};
use crate::id::{ItemId, ItemKind};
use crate::model::item::Item;

/// Options for a single graph build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphOptions {
    /// Pull in items directly related to the focal items.
    pub include_related: bool,
}

/// A node of the rendered graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// Composite `<kind>:<id>` identifier, unique across kinds.
    pub id: String,
    pub item: ItemId,
    pub label: String,
    pub kind: ItemKind,
}

/// A labeled, directed edge between two rendered nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    /// `<source node id>-><target node id>`.
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: &'static str,
}

/// Derived node/edge lists for one rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphElements {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphElements {
    #[must_use]
    pub fn node(&self, node_id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Build the node/edge lists around `focal`.
///
/// Focal items do not have to be part of `pool`; related items are always
/// resolved against it.
pub fn build_graph<P: ItemPool + ?Sized>(
    focal: &[&Item],
    pool: &P,
    options: GraphOptions,
) -> GraphElements {
    let mut displayed: Vec<&Item> = Vec::with_capacity(focal.len());
    let mut seen: HashSet<ItemId> = HashSet::with_capacity(focal.len());

    for item in focal {
        if seen.insert(item.id) {
            displayed.push(item);
        }
    }

    if options.include_related {
        for item in focal {
            let related = outgoing_relations(*item, pool)
                .into_iter()
                .chain(incoming_relations(*item, pool));
            for relation in related {
                if seen.insert(relation.item.id) {
                    displayed.push(relation.item);
                }
            }
        }
    }

    let visible: BTreeMap<ItemId, &Item> = displayed.iter().map(|item| (item.id, *item)).collect();

    let nodes: Vec<GraphNode> = displayed
        .iter()
        .map(|item| GraphNode {
            id: item.id.node_id(),
            item: item.id,
            label: item.title.clone(),
            kind: item.kind(),
        })
        .collect();

    let mut edges = Vec::new();
    let mut edge_ids: HashSet<String> = HashSet::new();
    for item in &displayed {
        let source = item.id.node_id();
        for relation in outgoing_relations(*item, &visible) {
            let target = relation.item.id.node_id();
            let id = format!("{source}->{target}");
            if edge_ids.insert(id.clone()) {
                edges.push(GraphEdge {
                    id,
                    source: source.clone(),
                    target,
                    label: relation.label,
                });
            }
        }
    }

    debug!(
        focal = focal.len(),
        nodes = nodes.len(),
        edges = edges.len(),
        include_related = options.include_related,
        "built relationship graph"
    );

    GraphElements { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{Details, IssueDetails, Items, NewItem, RiskDetails};

    fn id(raw: &str) -> ItemId {
        raw.parse().expect("valid id")
    }

    fn issue(raw: &str, causes: &[&str]) -> Item {
        NewItem::new(
            format!("Title of {raw}"),
            Details::Issue(IssueDetails {
                causes: causes.iter().map(|c| id(c)).collect(),
                ..IssueDetails::default()
            }),
        )
        .into_item(id(raw))
    }

    fn risk(raw: &str) -> Item {
        NewItem::new(format!("Title of {raw}"), Details::Risk(RiskDetails::default()))
            .into_item(id(raw))
    }

    fn pool(items: Vec<Item>) -> Items {
        items.into_iter().map(|item| (item.id, item)).collect()
    }

    const RELATED: GraphOptions = GraphOptions {
        include_related: true,
    };

    #[test]
    fn issue_causing_risk_yields_two_nodes_and_one_edge() {
        let items = pool(vec![issue("issue-1", &["risk-1"]), risk("risk-1")]);
        let graph = build_graph(&[&items[&id("issue-1")]], &items, RELATED);

        let node_ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(node_ids, ["issue:issue-1", "risk:risk-1"]);
        assert_eq!(
            graph.edges,
            vec![GraphEdge {
                id: "issue:issue-1->risk:risk-1".into(),
                source: "issue:issue-1".into(),
                target: "risk:risk-1".into(),
                label: "causes",
            }]
        );
    }

    #[test]
    fn without_related_only_edges_between_focal_items_remain() {
        let items = pool(vec![issue("issue-1", &["risk-1"]), risk("risk-1")]);
        let graph = build_graph(&[&items[&id("issue-1")]], &items, GraphOptions::default());

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn incoming_relations_pull_in_referencing_items() {
        let items = pool(vec![issue("issue-1", &["risk-1"]), risk("risk-1")]);
        let graph = build_graph(&[&items[&id("risk-1")]], &items, RELATED);

        let node_ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(node_ids, ["risk:risk-1", "issue:issue-1"]);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, "issue:issue-1");
    }

    #[test]
    fn dangling_reference_produces_no_edge() {
        let items = pool(vec![issue("issue-1", &["issue-2"])]);
        let graph = build_graph(&[&items[&id("issue-1")]], &items, RELATED);

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn self_reference_renders_as_single_loop() {
        let items = pool(vec![issue("issue-1", &["issue-1"])]);
        let graph = build_graph(&[&items[&id("issue-1")]], &items, RELATED);

        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, "issue:issue-1");
        assert_eq!(graph.edges[0].target, "issue:issue-1");
    }

    #[test]
    fn duplicate_focal_items_and_references_are_collapsed() {
        let items = pool(vec![issue("issue-1", &["risk-1", "risk-1"]), risk("risk-1")]);
        let focal = &items[&id("issue-1")];
        let graph = build_graph(&[focal, focal], &items, RELATED);

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn serial_collisions_across_kinds_stay_distinct() {
        let items = pool(vec![issue("issue-1", &["risk-1"]), risk("risk-1")]);
        let all: Vec<&Item> = items.values().collect();
        let graph = build_graph(&all, &items, GraphOptions::default());

        assert!(graph.node("issue:issue-1").is_some());
        assert!(graph.node("risk:risk-1").is_some());
        assert_eq!(graph.edges.len(), 1);
    }
}
