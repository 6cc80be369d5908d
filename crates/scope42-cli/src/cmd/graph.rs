//! `scope42 graph`: relationship graph around focal items.
//!
//! Emits the node/edge lists as JSON (optionally with preset radial
//! positions) or as Graphviz DOT.

use crate::cmd::Context;
use crate::output::{pretty_section, render_mode};
use clap::{Args, ValueEnum};
use petgraph::dot::Dot;
use petgraph::graph::DiGraph;
use scope42_core::Item;
use scope42_core::graph::layout::{DEFAULT_CANVAS_SIZE, Position, radial_layout};
use scope42_core::graph::{GraphElements, GraphOptions, build_graph};
use scope42_core::selectors::select_all_items;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// First node centered, the rest evenly spaced on a ring.
    Radial,
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Focal items. Without any, the whole workspace is drawn.
    pub ids: Vec<String>,

    /// Also draw items directly related to the focal items.
    #[arg(short, long)]
    pub related: bool,

    /// Emit Graphviz DOT instead of node/edge lists.
    #[arg(long)]
    pub dot: bool,

    /// Attach preset node positions.
    #[arg(long, value_enum)]
    pub layout: Option<Layout>,

    /// Canvas edge length for --layout.
    #[arg(long, default_value_t = DEFAULT_CANVAS_SIZE)]
    pub canvas: f64,
}

#[derive(Debug, Serialize)]
struct GraphOutput {
    #[serde(flatten)]
    elements: GraphElements,
    #[serde(skip_serializing_if = "Option::is_none")]
    positions: Option<Vec<NodePosition>>,
}

#[derive(Debug, Serialize)]
struct NodePosition {
    id: String,
    #[serde(flatten)]
    position: Position,
}

/// Graphviz DOT for `elements`. Nodes are labeled `<id>: <title>`, edges with
/// their relation label.
pub fn to_dot(elements: &GraphElements) -> String {
    let mut graph = DiGraph::<String, &'static str>::new();
    let mut index = HashMap::with_capacity(elements.nodes.len());
    for node in &elements.nodes {
        let idx = graph.add_node(format!("{}: {}", node.item, node.label));
        index.insert(node.id.as_str(), idx);
    }
    for edge in &elements.edges {
        if let (Some(&a), Some(&b)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) {
            graph.add_edge(a, b, edge.label);
        }
    }
    format!("{}", Dot::with_config(&graph, &[]))
}

pub fn run_graph(args: &GraphArgs, ctx: &Context) -> anyhow::Result<()> {
    let ids = args
        .ids
        .iter()
        .map(|raw| ctx.parse_id(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let session = ctx.open(false)?;
    let items = session.store.items();
    let focal: Vec<&Item> = if ids.is_empty() {
        select_all_items(items)
    } else {
        ids.iter()
            .map(|id| session.require(ctx.output, *id))
            .collect::<anyhow::Result<_>>()?
    };

    let elements = build_graph(
        &focal,
        items,
        GraphOptions {
            include_related: args.related,
        },
    );

    if args.dot {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write!(out, "{}", to_dot(&elements))?;
        return Ok(());
    }

    let positions = args.layout.map(|Layout::Radial| {
        radial_layout(&elements, args.canvas)
            .into_iter()
            .map(|(id, position)| NodePosition { id, position })
            .collect()
    });
    let report = GraphOutput {
        elements,
        positions,
    };
    render_mode(ctx.output, &report, render_graph_text, render_graph_human)
}

fn render_graph_text(graph: &GraphOutput, w: &mut dyn Write) -> io::Result<()> {
    for node in &graph.elements.nodes {
        writeln!(w, "node\t{}\t{}", node.item, node.label)?;
    }
    for edge in &graph.elements.edges {
        writeln!(w, "edge\t{}\t{}\t{}", edge.source, edge.label, edge.target)?;
    }
    Ok(())
}

fn render_graph_human(graph: &GraphOutput, w: &mut dyn Write) -> io::Result<()> {
    let elements = &graph.elements;
    if elements.is_empty() {
        return writeln!(w, "Nothing to draw");
    }
    pretty_section(w, &format!("Nodes ({})", elements.nodes.len()))?;
    for node in &elements.nodes {
        writeln!(w, "{:<16} {}", node.item.to_string(), node.label)?;
    }
    writeln!(w)?;
    pretty_section(w, &format!("Edges ({})", elements.edges.len()))?;
    for edge in &elements.edges {
        let source = elements.node(&edge.source).map_or("?".to_string(), |n| n.item.to_string());
        let target = elements.node(&edge.target).map_or("?".to_string(), |n| n.item.to_string());
        writeln!(w, "{source:<16} {:<12} {target}", edge.label)?;
    }
    Ok(())
}
