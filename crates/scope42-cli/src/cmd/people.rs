use crate::cmd::Context;
use crate::output::render;
use scope42_core::selectors::select_all_person_names;
use std::io::Write;

/// `scope42 people`: comment authors and decision deciders, sorted.
pub fn run_people(ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.open(false)?;
    let names = select_all_person_names(session.store.items());
    render(ctx.output, &names, |names, w| {
        for name in names {
            writeln!(w, "{name}")?;
        }
        Ok(())
    })
}
