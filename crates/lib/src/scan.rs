//! Filesystem enumeration of present build artifacts.
//!
//! Walks a build-output root and yields the relative key of every regular
//! file, in the same normalized form manifest entries use, so the two can
//! be compared by direct set membership.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Errors that can occur while scanning a build-output root.
#[derive(Debug, Error)]
pub enum ScanError {
  /// The root does not exist or is not a directory.
  #[error("build-output root is not a directory: {0}")]
  NotADirectory(PathBuf),

  /// The root itself could not be read.
  #[error("failed to read build-output root '{path}': {source}")]
  ReadRoot {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },
}

/// Enumerate every regular file under `root` as a root-relative key.
///
/// Symlinked directories are not followed, so the traversal is bounded to
/// the root. Entries below the root that cannot be read are skipped with a
/// warning rather than failing the scan: a file we could not see simply
/// stays out of the present set, which can only ever under-delete.
pub fn scan(root: &Path) -> Result<BTreeSet<String>, ScanError> {
  if !root.is_dir() {
    return Err(ScanError::NotADirectory(root.to_path_buf()));
  }

  let mut present = BTreeSet::new();

  for entry in WalkDir::new(root).follow_links(false) {
    let entry = match entry {
      Ok(entry) => entry,
      Err(err) => {
        // An unreadable root is fatal; anything deeper is skippable.
        if err.path() == Some(root) {
          return Err(ScanError::ReadRoot {
            path: root.to_path_buf(),
            source: err,
          });
        }
        warn!(error = %err, "skipping unreadable entry during scan");
        continue;
      }
    };

    if !entry.file_type().is_file() {
      continue;
    }

    // The advisory lock lives in the root and is never a build artifact.
    if entry.depth() == 1 && entry.file_name() == crate::lock::LOCK_FILENAME {
      continue;
    }

    match relative_key(root, entry.path()) {
      Some(key) => {
        present.insert(key);
      }
      None => {
        // Manifest entries are UTF-8, so a key we cannot represent can
        // never be declared; leaving it out of the present set means it
        // is never deleted either.
        warn!(path = %entry.path().display(), "skipping artifact with non-UTF-8 path");
      }
    }
  }

  debug!(root = %root.display(), count = present.len(), "scanned build-output root");
  Ok(present)
}

/// Compute the manifest-relative key for a path under `root`.
///
/// Uses component-wise prefix stripping, never fixed-offset string
/// slicing, so the result is correct for any root path. Components are
/// joined with `/` on every platform.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
  let relative = path.strip_prefix(root).ok()?;
  let parts: Vec<&str> = relative
    .components()
    .map(|c| c.as_os_str().to_str())
    .collect::<Option<Vec<_>>>()?;

  if parts.is_empty() {
    return None;
  }

  Some(parts.join("/"))
}
