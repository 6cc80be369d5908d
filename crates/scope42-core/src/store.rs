//! The workspace store: the single owner of the open workspace and its items.
//!
//! # Overview
//!
//! [`Store`] holds the workspace state machine
//! (`Closed → Loading → Open | Failed`), the in-memory item mapping and a
//! [`SearchSink`] that mirrors every change. All operations are synchronous
//! and take `&mut self`, so there is exactly one writer.
//!
//! Mutations persist first and only then touch the mapping: a failed write
//! leaves the items exactly as they were and the workspace stays open. A
//! demo workspace has no location and its mutations stay in memory.

use std::path::{Path, PathBuf};

use chrono::{TimeDelta, Utc};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::WorkspaceConfig;
use crate::error::ErrorCode;
use crate::id::{ItemId, ItemKind};
use crate::model::item::{Item, ItemError, Items, NewItem};
use crate::persistence::{LoadError, WorkspaceDir, WriteError, load_items};
use crate::search::{NoopSearch, SearchSink};
use crate::selectors::next_item_id;

const DEMO_DATA: &str = include_str!("../assets/demo.json");

/// Name shown for the embedded demo workspace.
pub const DEMO_WORKSPACE_NAME: &str = "Demo";

/// Lifecycle of the workspace held by a [`Store`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WorkspaceState {
    #[default]
    Closed,
    Loading,
    Open {
        name: String,
        /// `None` for the demo workspace.
        location: Option<PathBuf>,
    },
    Failed {
        error: String,
    },
}

impl WorkspaceState {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Errors returned by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no workspace is open")]
    NoWorkspace,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("demo dataset is corrupt: {0}")]
    DemoData(#[source] serde_json::Error),

    /// Another process changed the workspace; reload before retrying.
    #[error("workspace is stale: {} was changed by another process", .path.display())]
    Stale { path: PathBuf },

    #[error(transparent)]
    Write(WriteError),

    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error("no serial numbers left for {0} items")]
    SerialsExhausted(ItemKind),

    #[error("item {0} already exists")]
    DuplicateId(ItemId),

    #[error(transparent)]
    InvalidItem(#[from] ItemError),
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NoWorkspace => ErrorCode::NoWorkspaceOpen,
            Self::Load(err) => err.code(),
            Self::DemoData(_) => ErrorCode::DemoDataCorrupt,
            Self::Stale { .. } => ErrorCode::StaleWorkspace,
            Self::Write(err) => err.code(),
            Self::ItemNotFound(_) => ErrorCode::ItemNotFound,
            Self::SerialsExhausted(_) => ErrorCode::SerialsExhausted,
            Self::DuplicateId(_) => ErrorCode::DuplicateItemId,
            Self::InvalidItem(err) => err.code(),
        }
    }

    /// Whether `reload_workspace` followed by a retry can succeed.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }
}

impl From<WriteError> for StoreError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Stale { path } => Self::Stale { path },
            other => Self::Write(other),
        }
    }
}

#[derive(Deserialize)]
struct DemoData {
    items: Vec<Item>,
}

/// Owner of the open workspace, its items and the search mirror.
pub struct Store {
    state: WorkspaceState,
    dir: Option<WorkspaceDir>,
    items: Items,
    index: Box<dyn SearchSink>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Box::new(NoopSearch))
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// A closed store that mirrors item changes into `index`.
    #[must_use]
    pub fn new(index: Box<dyn SearchSink>) -> Self {
        Self {
            state: WorkspaceState::Closed,
            dir: None,
            items: Items::new(),
            index,
        }
    }

    #[must_use]
    pub const fn workspace(&self) -> &WorkspaceState {
        &self.state
    }

    #[must_use]
    pub const fn items(&self) -> &Items {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Root directory of the open workspace, `None` when closed or in demo mode.
    #[must_use]
    pub fn location(&self) -> Option<&Path> {
        self.dir.as_ref().map(WorkspaceDir::root)
    }

    /// File backing `id`, `None` when closed or in demo mode.
    #[must_use]
    pub fn item_path(&self, id: ItemId) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.item_path(id))
    }

    /// Create a workspace at `path` and open it.
    ///
    /// # Errors
    ///
    /// Write failures for the config or readme, then anything
    /// [`Store::open_workspace`] returns.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn create_workspace(&mut self, path: &Path) -> Result<(), StoreError> {
        let mut dir = WorkspaceDir::new(path);
        dir.write_config(&WorkspaceConfig::default())?;
        dir.write_readme()?;
        info!("created workspace");
        self.open_workspace(path)
    }

    /// Load the workspace at `path`, replacing whatever was open.
    ///
    /// # Errors
    ///
    /// Returns the load failure. The store is then in the `Failed` state with
    /// no items.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open_workspace(&mut self, path: &Path) -> Result<(), StoreError> {
        self.state = WorkspaceState::Loading;
        match load_items(path) {
            Ok((dir, items)) => {
                let name = dir.name();
                info!(workspace = %name, items = items.len(), "opened workspace");
                self.state = WorkspaceState::Open {
                    name,
                    location: Some(dir.root().to_path_buf()),
                };
                self.dir = Some(dir);
                self.replace_items(items);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to open workspace");
                self.fail(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Open the embedded demo dataset. Nothing done in it is persisted.
    ///
    /// # Errors
    ///
    /// [`StoreError::DemoData`] if the dataset does not parse, or
    /// [`StoreError::InvalidItem`] if an item in it is invalid.
    #[instrument(skip(self))]
    pub fn open_demo_workspace(&mut self) -> Result<(), StoreError> {
        self.state = WorkspaceState::Loading;
        let items = match parse_demo(DEMO_DATA) {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, "failed to open demo workspace");
                self.fail(err.to_string());
                return Err(err);
            }
        };

        info!(items = items.len(), "opened demo workspace");
        self.state = WorkspaceState::Open {
            name: DEMO_WORKSPACE_NAME.to_string(),
            location: None,
        };
        self.dir = None;
        self.replace_items(items);
        Ok(())
    }

    /// Return to the initial state and clear the search index.
    #[instrument(skip(self))]
    pub fn close_workspace(&mut self) {
        self.state = WorkspaceState::Closed;
        self.dir = None;
        self.items.clear();
        self.index.reset();
        debug!("closed workspace");
    }

    /// Close and reopen the current workspace from disk, picking up changes
    /// made by other processes.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoWorkspace`] when there is no location to reload from,
    /// otherwise whatever [`Store::open_workspace`] returns.
    #[instrument(skip(self))]
    pub fn reload_workspace(&mut self) -> Result<(), StoreError> {
        let root = self
            .location()
            .map(Path::to_path_buf)
            .ok_or(StoreError::NoWorkspace)?;
        self.close_workspace();
        self.open_workspace(&root)
    }

    /// Assign the next identifier of the item's kind, persist and index it.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoWorkspace`], [`StoreError::SerialsExhausted`], an
    /// invalid item, or a write failure. An identifier or item file that is
    /// already taken fails with [`StoreError::DuplicateId`] or
    /// [`WriteError::AlreadyExists`] instead of being replaced. The mapping is
    /// unchanged on error.
    #[instrument(skip_all, fields(kind = %new_item.kind()))]
    pub fn create_item(&mut self, new_item: NewItem) -> Result<ItemId, StoreError> {
        self.ensure_open()?;
        let kind = new_item.kind();
        let id = next_item_id(&self.items, kind).ok_or(StoreError::SerialsExhausted(kind))?;
        if self.items.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        let item = new_item.into_item(id);
        item.validate()?;

        if let Some(dir) = self.dir.as_mut() {
            dir.write_new_item(&item)?;
        }

        self.index.add(&item);
        self.items.insert(id, item);
        info!(%id, "created item");
        Ok(id)
    }

    /// Replace an existing item, stamping a new modification time.
    ///
    /// The stored `modified` is strictly later than the previous one even if
    /// the clock has not advanced.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoWorkspace`], [`StoreError::ItemNotFound`], an invalid
    /// item, or a write failure ([`StoreError::Stale`] if another process
    /// changed the file). The mapping is unchanged on error.
    #[instrument(skip_all, fields(id = %item.id))]
    pub fn update_item(&mut self, mut item: Item) -> Result<(), StoreError> {
        self.ensure_open()?;
        let previous = self
            .items
            .get(&item.id)
            .ok_or(StoreError::ItemNotFound(item.id))?;
        item.validate()?;
        item.modified = Utc::now().max(previous.modified + TimeDelta::microseconds(1));

        if let Some(dir) = self.dir.as_mut() {
            dir.write_item(&item)?;
        }

        self.index.update(&item);
        debug!("updated item");
        self.items.insert(item.id, item);
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.state.is_open() {
            Ok(())
        } else {
            Err(StoreError::NoWorkspace)
        }
    }

    fn replace_items(&mut self, items: Items) {
        self.index.reset();
        for item in items.values() {
            self.index.add(item);
        }
        self.items = items;
    }

    fn fail(&mut self, error: String) {
        self.state = WorkspaceState::Failed { error };
        self.dir = None;
        self.items.clear();
        self.index.reset();
    }
}

fn parse_demo(raw: &str) -> Result<Items, StoreError> {
    let data: DemoData = serde_json::from_str(raw).map_err(StoreError::DemoData)?;
    let mut items = Items::new();
    for item in data.items {
        item.validate()?;
        items.insert(item.id, item);
    }
    Ok(items)
}
