//! `scope42 show`: display one item with its relations.
//!
//! Outgoing relations come from the item's own reference fields; incoming
//! relations are found by scanning the workspace and carry the inverse label
//! (`caused by`, `solved by`, ...).

use crate::cmd::Context;
use crate::output::{pretty_kv, pretty_rule, pretty_section, render_mode};
use chrono::{DateTime, Local, Utc};
use clap::Args;
use scope42_core::config::WorkspaceConfig;
use scope42_core::graph::{Relation, incoming_relations, outgoing_relations};
use scope42_core::model::item::Details;
use scope42_core::{Item, ItemKind, Items};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Item to display, e.g. decision-2.
    pub id: String,
}

#[derive(Debug, Serialize)]
struct ShowItem {
    id: String,
    kind: ItemKind,
    title: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ticket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ticket_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<DecisionView>,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
    outgoing: Vec<RelationRow>,
    incoming: Vec<RelationRow>,
    comments: Vec<CommentRow>,
}

#[derive(Debug, Serialize)]
struct DecisionView {
    deciders: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct RelationRow {
    label: &'static str,
    id: String,
    title: String,
}

impl From<&Relation<'_>> for RelationRow {
    fn from(relation: &Relation<'_>) -> Self {
        Self {
            label: relation.label,
            id: relation.item.id.to_string(),
            title: relation.item.title.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CommentRow {
    author: String,
    content: String,
    created: DateTime<Utc>,
}

fn build_view(item: &Item, items: &Items, config: &WorkspaceConfig) -> ShowItem {
    let decision = match &item.details {
        Details::Decision(d) => Some(DecisionView {
            deciders: d.deciders.clone(),
            context: d.context.clone(),
            decision: d.decision.clone(),
        }),
        _ => None,
    };
    ShowItem {
        id: item.id.to_string(),
        kind: item.kind(),
        title: item.title.clone(),
        status: item.details.status_str(),
        description: item.description.clone(),
        tags: item.tags.clone(),
        ticket: item.ticket.clone(),
        ticket_url: item.ticket.as_deref().map(|t| config.ticket_url(t)),
        decision,
        created: item.created,
        modified: item.modified,
        outgoing: outgoing_relations(item, items)
            .iter()
            .map(RelationRow::from)
            .collect(),
        incoming: incoming_relations(item, items)
            .iter()
            .map(RelationRow::from)
            .collect(),
        comments: item
            .comments
            .iter()
            .map(|c| CommentRow {
                author: c.author.clone(),
                content: c.content.clone(),
                created: c.created,
            })
            .collect(),
    }
}

pub fn run_show(args: &ShowArgs, ctx: &Context) -> anyhow::Result<()> {
    let id = ctx.parse_id(&args.id)?;
    let session = ctx.open(false)?;
    let item = session.require(ctx.output, id)?;
    let view = build_view(item, session.store.items(), &session.config);
    render_mode(ctx.output, &view, render_show_text, render_show_human)
}

fn local(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn render_show_human(item: &ShowItem, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("{} ({})", item.id, item.kind))?;
    writeln!(w, "{}", item.title)?;
    pretty_rule(w)?;
    pretty_kv(w, "status", item.status)?;
    if !item.tags.is_empty() {
        pretty_kv(w, "tags", item.tags.join(", "))?;
    }
    if let Some(url) = &item.ticket_url {
        pretty_kv(w, "ticket", url)?;
    }
    pretty_kv(w, "created", local(item.created))?;
    pretty_kv(w, "modified", local(item.modified))?;

    if let Some(description) = &item.description {
        writeln!(w)?;
        writeln!(w, "{description}")?;
    }

    if let Some(decision) = &item.decision {
        writeln!(w)?;
        if !decision.deciders.is_empty() {
            pretty_kv(w, "deciders", decision.deciders.join(", "))?;
        }
        if let Some(context) = &decision.context {
            pretty_kv(w, "context", context)?;
        }
        if let Some(text) = &decision.decision {
            pretty_kv(w, "decision", text)?;
        }
    }

    if !item.outgoing.is_empty() || !item.incoming.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Relations")?;
        for row in item.outgoing.iter().chain(&item.incoming) {
            writeln!(w, "{:<14} {:<16} {}", row.label, row.id, row.title)?;
        }
    }

    if !item.comments.is_empty() {
        writeln!(w)?;
        pretty_section(w, &format!("Comments ({})", item.comments.len()))?;
        for comment in &item.comments {
            writeln!(w, "{} · {}", comment.author, local(comment.created))?;
            writeln!(w, "  {}", comment.content.replace('\n', "\n  "))?;
        }
    }
    Ok(())
}

fn render_show_text(item: &ShowItem, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}\t{}\t{}", item.id, item.status, item.title)?;
    for row in item.outgoing.iter().chain(&item.incoming) {
        writeln!(w, "{}\t{}", row.label, row.id)?;
    }
    Ok(())
}
