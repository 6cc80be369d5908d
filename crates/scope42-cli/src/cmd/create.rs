use crate::cmd::list::{ItemRow, write_row_text};
use crate::cmd::{Context, fail};
use crate::output::{CliError, pretty_kv, render_mode};
use crate::validate;
use clap::Args;
use scope42_core::error::ErrorCode;
use scope42_core::model::item::{Details, NewItem};
use scope42_core::{ItemId, ItemKind};
use serde::Serialize;
use std::io::Write;
use tracing::debug;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Item type: issue, risk, improvement or decision.
    pub kind: ItemKind,

    /// Short title.
    #[arg(short, long)]
    pub title: String,

    /// Longer description.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Tag to attach. Repeatable.
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Initial status. Defaults to the first status of the type.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Item this one causes, solves, modifies or supersedes. Repeatable.
    #[arg(long = "ref", value_name = "ID")]
    pub refs: Vec<ItemId>,

    /// Ticket ID or URL.
    #[arg(long)]
    pub ticket: Option<String>,

    /// Person who took the decision. Repeatable; decisions only.
    #[arg(long = "decider", value_name = "NAME")]
    pub deciders: Vec<String>,

    /// Forces that led to the decision. Decisions only.
    #[arg(long)]
    pub context: Option<String>,

    /// What was decided. Decisions only.
    #[arg(long)]
    pub decision: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateOutput {
    #[serde(flatten)]
    item: ItemRow,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

fn invalid(message: impl Into<String>) -> CliError {
    CliError::from_code(ErrorCode::InvalidItem, message)
}

/// Turn the arguments into a [`NewItem`], checking everything that does not
/// need the workspace.
fn build_new_item(args: &CreateArgs) -> Result<NewItem, CliError> {
    validate::validate_title(&args.title).map_err(|e| e.to_cli_error())?;
    for tag in &args.tags {
        validate::validate_tag(tag).map_err(|e| e.to_cli_error())?;
    }

    let mut details = Details::empty(args.kind);
    if let Some(status) = &args.status {
        details
            .set_status(status)
            .map_err(|e| invalid(format!("{} {e}", args.kind)))?;
    }

    match &mut details {
        Details::Decision(decision) => {
            decision.deciders.clone_from(&args.deciders);
            decision.context.clone_from(&args.context);
            decision.decision.clone_from(&args.decision);
        }
        _ if !args.deciders.is_empty() || args.context.is_some() || args.decision.is_some() => {
            return Err(invalid(format!(
                "--decider, --context and --decision only apply to decisions, not to a {}",
                args.kind
            )));
        }
        _ => {}
    }

    for target in &args.refs {
        details
            .link_to(*target)
            .map_err(|e| CliError::from_code(e.code(), e.to_string()))?;
    }

    let mut new = NewItem::new(args.title.clone(), details);
    new.description = args.description.clone().filter(|d| !d.trim().is_empty());
    new.tags.clone_from(&args.tags);
    new.ticket = args.ticket.clone();
    Ok(new)
}

pub fn run_create(args: &CreateArgs, ctx: &Context) -> anyhow::Result<()> {
    let new = build_new_item(args).map_err(|e| fail(ctx.output, &e))?;

    let mut session = ctx.open(false)?;
    for target in &args.refs {
        session.require(ctx.output, *target)?;
    }

    let id = session
        .store
        .create_item(new)
        .map_err(|err| fail(ctx.output, &CliError::from(&err)))?;
    debug!(%id, "item created");

    let item = session.require(ctx.output, id)?;
    let report = CreateOutput {
        item: ItemRow::from(item),
        path: session
            .store
            .item_path(id)
            .map(|p| p.display().to_string()),
    };

    render_mode(
        ctx.output,
        &report,
        |r, w| write_row_text(&r.item, w),
        |r, w| {
            writeln!(w, "✓ created {}: {}", r.item.id, r.item.title)?;
            pretty_kv(w, "status", r.item.status)?;
            if let Some(path) = &r.path {
                pretty_kv(w, "file", path)?;
            } else {
                pretty_kv(w, "file", "(demo workspace, not saved)")?;
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use scope42_core::model::item::RelationKind;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: CreateArgs,
    }

    fn args(argv: &[&str]) -> CreateArgs {
        Wrapper::parse_from(std::iter::once("test").chain(argv.iter().copied())).args
    }

    #[test]
    fn improvement_refs_pick_fields() {
        let new = build_new_item(&args(&[
            "improvement",
            "--title",
            "Introduce a read cache",
            "--ref",
            "issue-2",
            "--ref",
            "decision-1",
            "--tag",
            "performance",
        ]))
        .expect("valid");
        assert_eq!(new.kind(), ItemKind::Improvement);
        assert_eq!(new.tags, ["performance"]);
        let fields: Vec<(RelationKind, usize)> = new
            .details
            .reference_fields()
            .iter()
            .map(|(rel, ids)| (*rel, ids.len()))
            .collect();
        assert_eq!(
            fields,
            [(RelationKind::Solves, 1), (RelationKind::Modifies, 1)]
        );
    }

    #[test]
    fn status_must_belong_to_kind() {
        let err = build_new_item(&args(&["issue", "-t", "Flaky build", "-s", "mitigated"]))
            .unwrap_err();
        assert_eq!(err.error_code.as_deref(), Some("E2005"));

        let ok = build_new_item(&args(&["risk", "-t", "Flaky build", "-s", "mitigated"]))
            .expect("risk status");
        assert_eq!(ok.details.status_str(), "mitigated");
    }

    #[test]
    fn deciders_only_for_decisions() {
        let err =
            build_new_item(&args(&["risk", "-t", "x", "--decider", "Alice"])).unwrap_err();
        assert!(err.message.contains("only apply to decisions"));

        let new = build_new_item(&args(&[
            "decision",
            "-t",
            "Adopt event sourcing",
            "--decider",
            "Alice",
            "--context",
            "Audit requirements",
        ]))
        .expect("decision");
        let Details::Decision(decision) = new.details else {
            panic!("expected decision details");
        };
        assert_eq!(decision.deciders, ["Alice"]);
        assert_eq!(decision.context.as_deref(), Some("Audit requirements"));
    }

    #[test]
    fn unsupported_ref_is_rejected() {
        let err = build_new_item(&args(&["decision", "-t", "x", "--ref", "issue-1"]))
            .unwrap_err();
        assert_eq!(err.error_code.as_deref(), Some("E2004"));
    }

    #[test]
    fn blank_title_is_rejected() {
        assert!(build_new_item(&args(&["issue", "--title", ""])).is_err());
    }
}
