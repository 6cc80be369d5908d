//! `scope42 comment`: append a comment to an item.

use crate::author;
use crate::cmd::{Context, fail};
use crate::output::{CliError, render};
use crate::validate;
use chrono::Utc;
use clap::Args;
use scope42_core::model::item::Comment;
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct CommentArgs {
    /// Item to comment on, e.g. issue-3.
    pub id: String,

    /// Comment text.
    pub text: String,
}

#[derive(Debug, Serialize)]
struct CommentOutput {
    ok: bool,
    item_id: String,
    author: String,
    content: String,
    created: String,
    comments: usize,
}

pub fn run_comment(args: &CommentArgs, ctx: &Context) -> anyhow::Result<()> {
    let id = ctx.parse_id(&args.id)?;
    if let Err(e) = validate::validate_comment(&args.text) {
        return Err(fail(ctx.output, &e.to_cli_error()));
    }
    let author = author::require_author(ctx.author.as_deref(), ctx.config_author.as_deref())
        .map_err(|e| fail(ctx.output, &e))?;

    let mut session = ctx.open(false)?;
    let mut item = session.require(ctx.output, id)?.clone();
    let comment = Comment {
        author,
        content: args.text.clone(),
        created: Utc::now(),
    };
    item.comments.push(comment.clone());
    let count = item.comments.len();
    session
        .store
        .update_item(item)
        .map_err(|err| fail(ctx.output, &CliError::from(&err)))?;

    let report = CommentOutput {
        ok: true,
        item_id: id.to_string(),
        author: comment.author,
        content: comment.content,
        created: comment.created.to_rfc3339(),
        comments: count,
    };
    render(ctx.output, &report, |r, w| {
        writeln!(w, "✓ {} commented on {} ({} comments)", r.author, r.item_id, r.comments)
    })
}
