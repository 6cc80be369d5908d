//! Command handlers and the plumbing they share: locating and opening the
//! workspace, and turning failures into rendered [`CliError`]s.

pub mod comment;
pub mod completions;
pub mod create;
pub mod graph;
pub mod init;
pub mod link;
pub mod list;
pub mod people;
pub mod search;
pub mod show;
pub mod tags;
pub mod update;

use crate::output::{CliError, OutputMode, render_error};
use anyhow::Context as _;
use scope42_core::config::{WORKSPACE_CONFIG_FILE, WorkspaceConfig, load_workspace_config};
use scope42_core::error::ErrorCode;
use scope42_core::{Item, ItemId, Store};
use scope42_search::SearchIndex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings resolved from global flags and user config, shared by every
/// command.
#[derive(Debug, Clone)]
pub struct Context {
    pub output: OutputMode,
    /// Explicit `--workspace`; otherwise the nearest ancestor of `cwd`.
    pub workspace: Option<PathBuf>,
    pub demo: bool,
    pub author: Option<String>,
    /// `author` from the user config.
    pub config_author: Option<String>,
    pub cwd: PathBuf,
}

/// An open store plus what was loaded alongside it.
pub struct Session {
    pub store: Store,
    pub config: WorkspaceConfig,
    /// Present when search was requested and enabled for the workspace.
    pub search: Option<SearchIndex>,
}

/// Walk up from `start` to the first directory containing `scope42.yml`.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(WORKSPACE_CONFIG_FILE).is_file() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Render `error` and turn it into the command's failure.
pub fn fail(output: OutputMode, error: &CliError) -> anyhow::Error {
    match render_error(output, error) {
        Ok(()) => anyhow::anyhow!("{}", error.message),
        Err(render_err) => render_err,
    }
}

impl Context {
    /// Absolute form of `path`, resolved against the working directory.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    fn workspace_root(&self) -> anyhow::Result<PathBuf> {
        if let Some(explicit) = &self.workspace {
            return Ok(self.absolute(explicit));
        }
        find_workspace_root(&self.cwd).ok_or_else(|| {
            fail(
                self.output,
                &CliError::from_code(
                    ErrorCode::NotAWorkspace,
                    format!(
                        "no {WORKSPACE_CONFIG_FILE} found in {} or any parent directory",
                        self.cwd.display()
                    ),
                ),
            )
        })
    }

    /// Open the workspace (or the demo), optionally with a search index
    /// mirroring the store.
    pub fn open(&self, with_search: bool) -> anyhow::Result<Session> {
        if self.demo {
            let (mut store, search) = new_store(with_search)?;
            store
                .open_demo_workspace()
                .map_err(|err| fail(self.output, &CliError::from(&err)))?;
            return Ok(Session {
                store,
                config: WorkspaceConfig::default(),
                search,
            });
        }

        let root = self.workspace_root()?;
        let config = load_workspace_config(&root).map_err(|err| {
            fail(
                self.output,
                &CliError::from_code(ErrorCode::ConfigParseError, format!("{err:#}")),
            )
        })?;
        let (mut store, search) = new_store(with_search && config.search.enabled)?;
        debug!(root = %root.display(), search = search.is_some(), "opening workspace");
        store
            .open_workspace(&root)
            .map_err(|err| fail(self.output, &CliError::from(&err)))?;
        Ok(Session {
            store,
            config,
            search,
        })
    }

    /// Parse an item ID argument.
    pub fn parse_id(&self, raw: &str) -> anyhow::Result<ItemId> {
        raw.parse().map_err(|err: scope42_core::id::ParseIdError| {
            fail(
                self.output,
                &CliError::from_code(ErrorCode::InvalidItemId, err.to_string()),
            )
        })
    }
}

fn new_store(with_search: bool) -> anyhow::Result<(Store, Option<SearchIndex>)> {
    if with_search {
        let index = SearchIndex::open_in_memory().context("start search index")?;
        Ok((Store::new(Box::new(index.clone())), Some(index)))
    } else {
        Ok((Store::default(), None))
    }
}

impl Session {
    /// The item with `id`, or a rendered not-found failure.
    pub fn require(&self, output: OutputMode, id: ItemId) -> anyhow::Result<&Item> {
        self.store.get(id).ok_or_else(|| {
            fail(
                output,
                &CliError::with_details(
                    format!("item {id} not found"),
                    "use `scope42 list` to see available items",
                    ErrorCode::ItemNotFound.code(),
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_root_from_nested_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join(WORKSPACE_CONFIG_FILE), "").expect("write");
        let nested = dir.path().join("docs/architecture");
        std::fs::create_dir_all(&nested).expect("mkdir");

        assert_eq!(find_workspace_root(&nested).as_deref(), Some(dir.path()));
    }

    #[test]
    fn no_root_outside_a_workspace() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert_eq!(find_workspace_root(dir.path()), None);
    }

    #[test]
    fn relative_paths_resolve_against_cwd() {
        let ctx = Context {
            output: OutputMode::Text,
            workspace: None,
            demo: false,
            author: None,
            config_author: None,
            cwd: PathBuf::from("/work"),
        };
        assert_eq!(ctx.absolute(Path::new("arch")), PathBuf::from("/work/arch"));
        assert_eq!(ctx.absolute(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
