use crate::cmd::Context;
use crate::output::render;
use scope42_core::selectors::select_all_tags;
use std::io::Write;

/// `scope42 tags`: every distinct tag in the workspace, sorted.
pub fn run_tags(ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.open(false)?;
    let tags = select_all_tags(session.store.items());
    render(ctx.output, &tags, |tags, w| {
        for tag in tags {
            writeln!(w, "{tag}")?;
        }
        Ok(())
    })
}
