//! Incremental staging of a built artifact into a consumption directory.
//!
//! Staging copies `source` into `dest_dir` only when the destination is
//! missing or strictly older than the source, so repeated dev-loop and CI
//! invocations skip redundant large-binary copies.
//!
//! This relies on the upstream build bumping the source's modification
//! time whenever its content changes, and on build and staging hosts
//! sharing a sane clock. Neither is verified here; a build system that
//! touches files without changing them simply causes an extra copy, and
//! clock skew can cause a stale skip.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while staging an artifact.
#[derive(Debug, Error)]
pub enum StageError {
  /// The source artifact does not exist. This means the upstream build
  /// failed to produce it, so it is always fatal.
  #[error("source artifact does not exist: {0}")]
  MissingSource(PathBuf),

  /// The source path has no filename component to stage under.
  #[error("source path has no filename: {0}")]
  InvalidSource(PathBuf),

  #[error("failed to read metadata for '{path}': {source}")]
  Metadata {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to create staging directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The copy itself failed. Destination state is undefined afterwards;
  /// the operation must be retried from scratch.
  #[error("failed to copy '{src}' to '{dst}': {source}")]
  Copy {
    src: PathBuf,
    dst: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

#[derive(Debug, Serialize)]
pub struct StageOutcome {
  pub copied: bool,
  pub destination: PathBuf,
}

/// Copy `source` into `dest_dir` if the staged copy is missing or stale.
///
/// The destination keeps the source's filename. Staleness is a strict
/// mtime comparison: an equal timestamp counts as already up to date.
/// Returns whether a copy actually happened.
pub fn stage(source: &Path, dest_dir: &Path) -> Result<StageOutcome, StageError> {
  if !source.exists() {
    return Err(StageError::MissingSource(source.to_path_buf()));
  }

  let name = source
    .file_name()
    .ok_or_else(|| StageError::InvalidSource(source.to_path_buf()))?;
  let destination = dest_dir.join(name);

  let source_mtime = mtime(source)?;

  if destination.exists() {
    let dest_mtime = mtime(&destination)?;
    if dest_mtime >= source_mtime {
      debug!(destination = %destination.display(), "staged artifact is up to date");
      return Ok(StageOutcome {
        copied: false,
        destination,
      });
    }
  }

  if !dest_dir.exists() {
    fs::create_dir_all(dest_dir).map_err(|e| StageError::CreateDir {
      path: dest_dir.to_path_buf(),
      source: e,
    })?;
  }

  let bytes = fs::copy(source, &destination).map_err(|e| StageError::Copy {
    src: source.to_path_buf(),
    dst: destination.clone(),
    source: e,
  })?;

  info!(
    source = %source.display(),
    destination = %destination.display(),
    bytes,
    "staged artifact"
  );

  Ok(StageOutcome {
    copied: true,
    destination,
  })
}

fn mtime(path: &Path) -> Result<SystemTime, StageError> {
  fs::metadata(path)
    .and_then(|m| m.modified())
    .map_err(|e| StageError::Metadata {
      path: path.to_path_buf(),
      source: e,
    })
}
