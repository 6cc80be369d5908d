//! On-disk workspace layout.
//!
//! # Directory Layout
//!
//! ```text
//! <root>/
//!   scope42.yml                      # workspace config
//!   README.md
//!   items/
//!     issues/issue-1.yml             # one YAML document per item
//!     risks/risk-1.yml
//!     improvements/improvement-1.yml
//!     decisions/decision-1.yml
//!   .scope42.lock                    # advisory write lock
//! ```
//!
//! # Invariants
//!
//! - An item file's stem equals the item ID and it lives in the directory of
//!   the item's kind.
//! - Every file read or written by this process has its BLAKE3 fingerprint
//!   recorded. A write whose target no longer matches the recorded
//!   fingerprint (or exists without one) fails as stale.
//! - Writes go to a temp file in the same directory and are renamed into
//!   place while the workspace lock is held.

mod fingerprint;
mod load;
mod write;

use std::io;
use std::path::{Path, PathBuf};

use crate::error::ErrorCode;
use crate::id::{ItemId, ItemKind};
use crate::lock::{LOCK_FILE, LockError};
use crate::model::item::ItemError;

pub use fingerprint::Fingerprints;
pub use load::load_items;
pub use write::default_readme;

/// Directory below the root that holds the per-kind item directories.
pub const ITEMS_DIR: &str = "items";

/// File name of the workspace readme.
pub const README_FILE: &str = "README.md";

/// Errors raised while reading a workspace from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("workspace directory {} does not exist", .0.display())]
    MissingRoot(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("{} holds item {id}; expected file {}", .path.display(), .id.file_name())]
    FileNameMismatch { path: PathBuf, id: ItemId },

    #[error("{} holds a {found} but lives in the {expected} directory", .path.display())]
    WrongDirectory {
        path: PathBuf,
        expected: ItemKind,
        found: ItemKind,
    },

    #[error("invalid item in {}: {source}", .path.display())]
    Invalid { path: PathBuf, source: ItemError },

    #[error("item {id} is defined more than once ({})", .path.display())]
    Duplicate { path: PathBuf, id: ItemId },
}

impl LoadError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingRoot(_) => ErrorCode::NotAWorkspace,
            Self::Io { .. } | Self::Parse { .. } | Self::Duplicate { .. } => {
                ErrorCode::WorkspaceLoadFailed
            }
            Self::FileNameMismatch { .. } | Self::WrongDirectory { .. } => ErrorCode::KindMismatch,
            Self::Invalid { source, .. } => source.code(),
        }
    }
}

/// Errors raised while persisting to a workspace.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The target changed on disk since this process last read or wrote it.
    #[error("{} was changed by another process", .path.display())]
    Stale { path: PathBuf },

    /// A new item's file is already present.
    #[error("{} already exists", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("failed to write {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl WriteError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Stale { .. } => ErrorCode::StaleWorkspace,
            Self::AlreadyExists { .. } => ErrorCode::DuplicateItemId,
            Self::Lock(err) => err.code(),
            Self::Io { .. } | Self::Serialize { .. } => ErrorCode::ItemWriteFailed,
        }
    }

    /// Whether reloading the workspace resolves this failure.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }
}

/// Handle to a workspace directory plus the fingerprints of every file this
/// process has seen there.
#[derive(Debug, Clone)]
pub struct WorkspaceDir {
    root: PathBuf,
    fingerprints: Fingerprints,
}

impl WorkspaceDir {
    /// A handle with no recorded fingerprints. Use [`load_items`] to open an
    /// existing workspace.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fingerprints: Fingerprints::default(),
        }
    }

    pub(crate) const fn with_fingerprints(root: PathBuf, fingerprints: Fingerprints) -> Self {
        Self { root, fingerprints }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Display name of the workspace: the final path component.
    #[must_use]
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map_or_else(|| self.root.display().to_string(), |n| n.to_string_lossy().into_owned())
    }

    #[must_use]
    pub fn items_dir(&self, kind: ItemKind) -> PathBuf {
        self.root.join(ITEMS_DIR).join(kind.dir_name())
    }

    #[must_use]
    pub fn item_path(&self, id: ItemId) -> PathBuf {
        self.items_dir(id.kind()).join(id.file_name())
    }

    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    #[must_use]
    pub const fn fingerprints(&self) -> &Fingerprints {
        &self.fingerprints
    }
}
