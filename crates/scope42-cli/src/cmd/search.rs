//! `scope42 search`: full-text search over titles, descriptions, tags and
//! comments.

use crate::cmd::{Context, fail};
use crate::output::{CliError, pretty_section, render_mode};
use clap::Args;
use scope42_core::error::ErrorCode;
use scope42_search::SearchHit;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free text. The last word matches as a prefix.
    pub query: String,

    /// Maximum results.
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: u32,
}

#[derive(Debug, Serialize)]
struct SearchOutput {
    query: String,
    hits: Vec<SearchHit>,
}

pub fn run_search(args: &SearchArgs, ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.open(true)?;
    let Some(index) = &session.search else {
        return Err(fail(
            ctx.output,
            &CliError::with_details(
                "search is disabled for this workspace",
                "set `search: {enabled: true}` in scope42.yml",
                ErrorCode::SearchIndexUnavailable.code(),
            ),
        ));
    };

    let hits = index
        .search(&args.query, args.limit)
        .map_err(|err| {
            fail(
                ctx.output,
                &CliError::from_code(ErrorCode::SearchIndexUnavailable, format!("{err:#}")),
            )
        })?;

    let report = SearchOutput {
        query: args.query.clone(),
        hits,
    };
    render_mode(ctx.output, &report, render_search_text, render_search_human)
}

fn render_search_text(out: &SearchOutput, w: &mut dyn Write) -> io::Result<()> {
    for hit in &out.hits {
        writeln!(w, "{}\t{:.3}\t{}", hit.id, hit.rank, hit.title)?;
    }
    Ok(())
}

fn render_search_human(out: &SearchOutput, w: &mut dyn Write) -> io::Result<()> {
    if out.hits.is_empty() {
        return writeln!(w, "No matches for '{}'", out.query);
    }
    pretty_section(w, &format!("Matches for '{}' ({})", out.query, out.hits.len()))?;
    for hit in &out.hits {
        writeln!(w, "{:<16} {}", hit.id.to_string(), hit.title)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: SearchArgs,
    }

    #[test]
    fn limit_defaults_to_ten() {
        let w = Wrapper::parse_from(["test", "session store"]);
        assert_eq!(w.args.query, "session store");
        assert_eq!(w.args.limit, 10);
    }

    #[test]
    fn short_limit_flag() {
        let w = Wrapper::parse_from(["test", "cache", "-n", "3"]);
        assert_eq!(w.args.limit, 3);
    }
}
