use crate::cmd::list::{ItemRow, write_row_text};
use crate::cmd::{Context, fail};
use crate::output::{CliError, pretty_kv, render_mode};
use crate::validate;
use clap::Args;
use scope42_core::Item;
use scope42_core::error::ErrorCode;
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Item to change, e.g. risk-2.
    pub id: String,

    #[arg(short, long)]
    pub title: Option<String>,

    /// New description. An empty string clears it.
    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub status: Option<String>,

    #[arg(long, value_name = "TAG")]
    pub add_tag: Vec<String>,

    #[arg(long, value_name = "TAG")]
    pub remove_tag: Vec<String>,

    /// Ticket ID or URL. An empty string clears it.
    #[arg(long)]
    pub ticket: Option<String>,
}

impl UpdateArgs {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.add_tag.is_empty()
            && self.remove_tag.is_empty()
            && self.ticket.is_none()
    }
}

#[derive(Debug, Serialize)]
struct UpdateOutput {
    #[serde(flatten)]
    item: ItemRow,
    modified: String,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

/// Apply the requested changes to a copy of the item.
fn apply(args: &UpdateArgs, mut item: Item) -> Result<Item, CliError> {
    if let Some(title) = &args.title {
        validate::validate_title(title).map_err(|e| e.to_cli_error())?;
        item.title.clone_from(title);
    }
    if let Some(description) = &args.description {
        item.description = non_empty(description);
    }
    if let Some(status) = &args.status {
        let kind = item.kind();
        item.details
            .set_status(status)
            .map_err(|e| CliError::from_code(ErrorCode::InvalidItem, format!("{kind} {e}")))?;
    }
    for tag in &args.add_tag {
        validate::validate_tag(tag).map_err(|e| e.to_cli_error())?;
        if !item.tags.contains(tag) {
            item.tags.push(tag.clone());
        }
    }
    item.tags.retain(|t| !args.remove_tag.contains(t));
    if let Some(ticket) = &args.ticket {
        item.ticket = non_empty(ticket);
    }
    Ok(item)
}

pub fn run_update(args: &UpdateArgs, ctx: &Context) -> anyhow::Result<()> {
    let id = ctx.parse_id(&args.id)?;
    if args.is_empty() {
        return Err(fail(
            ctx.output,
            &CliError::with_details(
                "nothing to update",
                "pass at least one of --title, --description, --status, --add-tag, --remove-tag, --ticket",
                ErrorCode::InvalidItem.code(),
            ),
        ));
    }

    let mut session = ctx.open(false)?;
    let current = session.require(ctx.output, id)?.clone();
    let updated = apply(args, current).map_err(|e| fail(ctx.output, &e))?;
    session
        .store
        .update_item(updated)
        .map_err(|err| fail(ctx.output, &CliError::from(&err)))?;

    let item = session.require(ctx.output, id)?;
    let report = UpdateOutput {
        item: ItemRow::from(item),
        modified: item.modified.to_rfc3339(),
    };
    render_mode(
        ctx.output,
        &report,
        |r, w| write_row_text(&r.item, w),
        |r, w| {
            writeln!(w, "✓ updated {}: {}", r.item.id, r.item.title)?;
            pretty_kv(w, "status", r.item.status)?;
            pretty_kv(w, "tags", r.item.tags.join(", "))?;
            pretty_kv(w, "modified", &r.modified)
        },
    )
}
