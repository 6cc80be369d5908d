//! `scope42 link`: add a reference from one item to another.
//!
//! The reference field follows from the two kinds: issues and risks cause
//! issues and risks, improvements solve issues and risks and modify
//! decisions, decisions supersede decisions.

use crate::cmd::{Context, fail};
use crate::output::{CliError, render};
use clap::Args;
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Referencing item.
    pub from: String,

    /// Referenced item. Must exist.
    pub to: String,
}

#[derive(Debug, Serialize)]
struct LinkOutput {
    ok: bool,
    from: String,
    to: String,
    relation: &'static str,
}

pub fn run_link(args: &LinkArgs, ctx: &Context) -> anyhow::Result<()> {
    let from = ctx.parse_id(&args.from)?;
    let to = ctx.parse_id(&args.to)?;

    let mut session = ctx.open(false)?;
    session.require(ctx.output, to)?;
    let mut item = session.require(ctx.output, from)?.clone();
    let relation = item
        .link_to(to)
        .map_err(|e| fail(ctx.output, &CliError::from_code(e.code(), e.to_string())))?;
    session
        .store
        .update_item(item)
        .map_err(|err| fail(ctx.output, &CliError::from(&err)))?;

    let report = LinkOutput {
        ok: true,
        from: from.to_string(),
        to: to.to_string(),
        relation: relation.label(),
    };
    render(ctx.output, &report, |r, w| {
        writeln!(w, "✓ {} {} {}", r.from, r.relation, r.to)
    })
}
