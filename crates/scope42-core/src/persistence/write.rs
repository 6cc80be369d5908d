use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, instrument};

use super::{README_FILE, WorkspaceDir, WriteError};
use crate::config::{WORKSPACE_CONFIG_FILE, WorkspaceConfig};
use crate::lock::{DEFAULT_LOCK_TIMEOUT, WorkspaceLock};
use crate::model::item::Item;

/// Readme placed in freshly created workspaces.
#[must_use]
pub fn default_readme(name: &str) -> String {
    format!(
        "# {name}\n\n\
         This directory is a scope42 workspace: architecture issues, risks, \
         improvements and decisions tracked with aim42.\n\n\
         Each item is a YAML file below `items/`. Edit them with `scope42` so \
         that concurrent changes are detected.\n"
    )
}

impl WorkspaceDir {
    /// Persist `item` to its file.
    ///
    /// Holds the workspace lock for the check-and-write. On success the new
    /// content becomes the recorded fingerprint.
    ///
    /// # Errors
    ///
    /// [`WriteError::Stale`] if the file differs from what this process last
    /// saw, [`WriteError::Lock`] if another writer holds the lock too long,
    /// or an I/O or serialization failure.
    #[instrument(skip_all, fields(id = %item.id))]
    pub fn write_item(&mut self, item: &Item) -> Result<(), WriteError> {
        self.persist_item(item, false)
    }

    /// Persist a newly created `item`, refusing to replace any existing file.
    ///
    /// # Errors
    ///
    /// As [`WorkspaceDir::write_item`], plus [`WriteError::AlreadyExists`]
    /// if the file is present even though it is unchanged since last seen.
    #[instrument(skip_all, fields(id = %item.id))]
    pub fn write_new_item(&mut self, item: &Item) -> Result<(), WriteError> {
        self.persist_item(item, true)
    }

    fn persist_item(&mut self, item: &Item, create_only: bool) -> Result<(), WriteError> {
        let path = self.item_path(item.id);
        let content = serde_yaml::to_string(item).map_err(|source| WriteError::Serialize {
            path: path.clone(),
            source,
        })?;

        let lock = WorkspaceLock::acquire(&self.lock_path(), DEFAULT_LOCK_TIMEOUT)?;

        let current = match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(source) => return Err(WriteError::Io { path, source }),
        };
        if !self.fingerprints.matches(&path, current.as_deref()) {
            debug!(path = %path.display(), "item file changed out-of-band");
            return Err(WriteError::Stale { path });
        }
        if create_only && current.is_some() {
            return Err(WriteError::AlreadyExists { path });
        }

        atomic_write(&path, content.as_bytes())?;
        self.fingerprints.record(path, content.as_bytes());
        lock.release();

        debug!("item written");
        Ok(())
    }

    /// Write `scope42.yml`.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] on lock, serialization or I/O failure.
    pub fn write_config(&mut self, config: &WorkspaceConfig) -> Result<(), WriteError> {
        let content = serde_yaml::to_string(config).map_err(|source| WriteError::Serialize {
            path: self.root.join(WORKSPACE_CONFIG_FILE),
            source,
        })?;
        self.write_root_file(WORKSPACE_CONFIG_FILE, &content)
    }

    /// Write `README.md` with the default workspace readme.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] on lock or I/O failure.
    pub fn write_readme(&mut self) -> Result<(), WriteError> {
        let content = default_readme(&self.name());
        self.write_root_file(README_FILE, &content)
    }

    fn write_root_file(&mut self, name: &str, content: &str) -> Result<(), WriteError> {
        fs::create_dir_all(&self.root).map_err(|source| WriteError::Io {
            path: self.root.clone(),
            source,
        })?;
        let _lock = WorkspaceLock::acquire(&self.lock_path(), DEFAULT_LOCK_TIMEOUT)?;
        let path = self.root.join(name);
        atomic_write(&path, content.as_bytes())?;
        self.fingerprints.record(path, content.as_bytes());
        Ok(())
    }
}

fn atomic_write(path: &Path, content: &[u8]) -> Result<(), WriteError> {
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}
