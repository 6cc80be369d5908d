use crate::cmd::{Context, fail};
use crate::output::{CliError, pretty_kv, render};
use clap::Args;
use scope42_core::config::WORKSPACE_CONFIG_FILE;
use scope42_core::error::ErrorCode;
use scope42_core::{Store, WorkspaceState};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize. Defaults to --workspace, then the current directory.
    pub dir: Option<PathBuf>,

    /// Rewrite scope42.yml and README.md of an existing workspace. Items are kept.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitOutput {
    ok: bool,
    name: String,
    path: String,
    items: usize,
}

pub fn run_init(args: &InitArgs, ctx: &Context) -> anyhow::Result<()> {
    if ctx.demo {
        return Err(fail(
            ctx.output,
            &CliError::new("the demo workspace cannot be initialized on disk"),
        ));
    }

    let target = args
        .dir
        .as_deref()
        .or(ctx.workspace.as_deref())
        .map_or_else(|| ctx.cwd.clone(), |dir| ctx.absolute(dir));

    if target.join(WORKSPACE_CONFIG_FILE).exists() && !args.force {
        return Err(fail(
            ctx.output,
            &CliError::from_code(
                ErrorCode::AlreadyInitialized,
                format!("{} is already a scope42 workspace", target.display()),
            ),
        ));
    }

    let mut store = Store::default();
    store
        .create_workspace(&target)
        .map_err(|err| fail(ctx.output, &CliError::from(&err)))?;

    let name = match store.workspace() {
        WorkspaceState::Open { name, .. } => name.clone(),
        _ => String::new(),
    };
    let report = InitOutput {
        ok: true,
        name,
        path: target.display().to_string(),
        items: store.items().len(),
    };

    render(ctx.output, &report, |r, w| {
        writeln!(w, "✓ initialized workspace '{}'", r.name)?;
        pretty_kv(w, "path", &r.path)?;
        if r.items > 0 {
            pretty_kv(w, "items", r.items.to_string())?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: InitArgs,
    }

    #[test]
    fn defaults() {
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.dir.is_none());
        assert!(!w.args.force);
    }

    #[test]
    fn dir_and_force() {
        let w = Wrapper::parse_from(["test", "arch", "--force"]);
        assert_eq!(w.args.dir, Some(PathBuf::from("arch")));
        assert!(w.args.force);
    }
}
