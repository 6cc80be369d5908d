use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use super::{Fingerprints, LoadError, WorkspaceDir};
use crate::id::ItemKind;
use crate::model::item::{Item, Items};

/// Read every item of the workspace at `root`.
///
/// Either the whole mapping is returned or nothing: the first bad file
/// aborts the load. Files without a `.yml` extension are ignored, as are
/// missing per-kind directories.
///
/// # Errors
///
/// Returns [`LoadError`] when the root is missing or any item file cannot be
/// read, parsed or validated.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn load_items(root: &Path) -> Result<(WorkspaceDir, Items), LoadError> {
    if !root.is_dir() {
        return Err(LoadError::MissingRoot(root.to_path_buf()));
    }

    let dir = WorkspaceDir::new(root);
    let mut fingerprints = Fingerprints::default();
    let mut items = Items::new();

    for kind in ItemKind::ALL {
        for path in item_files(&dir.items_dir(kind))? {
            let content = fs::read(&path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            let item = parse_item(&path, kind, &content)?;
            fingerprints.record(&path, &content);
            let id = item.id;
            if items.insert(id, item).is_some() {
                return Err(LoadError::Duplicate { path, id });
            }
        }
    }

    debug!(items = items.len(), "loaded workspace items");
    Ok((
        WorkspaceDir::with_fingerprints(root.to_path_buf(), fingerprints),
        items,
    ))
}

/// `.yml` files of one kind directory, sorted by file name.
fn item_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(LoadError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "yml") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn parse_item(path: &Path, kind: ItemKind, content: &[u8]) -> Result<Item, LoadError> {
    let item: Item = serde_yaml::from_slice(content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    item.validate().map_err(|source| LoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    if item.kind() != kind {
        return Err(LoadError::WrongDirectory {
            path: path.to_path_buf(),
            expected: kind,
            found: item.kind(),
        });
    }

    let stem = path.file_stem().map(|s| s.to_string_lossy());
    if stem.as_deref() != Some(item.id.to_string().as_str()) {
        return Err(LoadError::FileNameMismatch {
            path: path.to_path_buf(),
            id: item.id,
        });
    }

    Ok(item)
}
