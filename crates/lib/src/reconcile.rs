//! Orphan reconciliation for a build-output root.
//!
//! An orphan is a file present on disk that no manifest declares. This is
//! a set-difference collector, not a mark-and-sweep: correctness rests on
//! the manifests being a complete declaration of every live artifact. The
//! `dry_run` mode exists so a suspicious diff can be previewed before
//! anything is unlinked.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::manifest::{Manifest, ManifestError};
use crate::scan::{self, ScanError};

/// Errors from the load-scan-reconcile pipeline.
///
/// Per-file deletion failures are not errors; they are counted in
/// [`ReconcileStats`] and logged. Only conditions that prevent the
/// reconciliation from starting at all are fatal.
#[derive(Debug, Error)]
pub enum CleanError {
  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error(transparent)]
  Scan(#[from] ScanError),
}

#[derive(Debug, Default, Serialize)]
pub struct ReconcileStats {
  pub files_scanned: usize,
  pub files_removed: usize,
  pub bytes_freed: u64,
  pub dirs_pruned: usize,
  pub delete_failures: usize,
}

#[derive(Debug, Serialize)]
pub struct ReconcileResult {
  pub stats: ReconcileStats,
  pub removed: Vec<String>,
}

/// Load manifests, scan `root`, and remove every orphan.
///
/// This is the whole cleanup path as the CLI drives it. Manifest and scan
/// failures abort before any file is touched.
pub fn clean_orphans(
  root: &Path,
  manifest_paths: &[PathBuf],
  dry_run: bool,
) -> Result<ReconcileResult, CleanError> {
  let declared = Manifest::load(manifest_paths)?;
  let present = scan::scan(root)?;
  let result = reconcile(&declared, &present, root, dry_run);

  info!(
    declared = declared.len(),
    present = result.stats.files_scanned,
    removed = result.stats.files_removed,
    pruned = result.stats.dirs_pruned,
    dry_run,
    "orphan reconciliation complete"
  );

  Ok(result)
}

/// Remove every file in `present` that `declared` does not cover, then
/// prune directories left empty.
///
/// Returns the set of removed keys. A file that vanished between scan and
/// delete counts as removed (another process beat us to it); any other
/// per-file failure is logged and skipped so one bad permission bit cannot
/// abort the rest of the sweep. With `dry_run` nothing on disk changes and
/// `removed` reports what a real run would delete.
pub fn reconcile(
  declared: &Manifest,
  present: &BTreeSet<String>,
  root: &Path,
  dry_run: bool,
) -> ReconcileResult {
  let mut stats = ReconcileStats {
    files_scanned: present.len(),
    ..ReconcileStats::default()
  };
  let mut removed = Vec::new();

  for key in present {
    if declared.contains(key) {
      continue;
    }

    let path = root.join(key);
    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    if dry_run {
      info!(path = %path.display(), "would remove orphaned artifact");
      stats.files_removed += 1;
      stats.bytes_freed += size;
      removed.push(key.clone());
      continue;
    }

    match fs::remove_file(&path) {
      Ok(()) => {
        info!(path = %path.display(), "removed orphaned artifact");
        stats.files_removed += 1;
        stats.bytes_freed += size;
        removed.push(key.clone());
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        // Deleted or renamed by someone else since the scan.
        debug!(path = %path.display(), "orphan already gone");
        stats.files_removed += 1;
        removed.push(key.clone());
      }
      Err(e) => {
        warn!(path = %path.display(), error = %e, "failed to remove orphaned artifact");
        stats.delete_failures += 1;
      }
    }
  }

  if !dry_run {
    stats.dirs_pruned = prune_empty_dirs(root);
  }

  ReconcileResult { stats, removed }
}

/// Remove directories under `root` left empty, deepest first.
///
/// Best-effort by construction: a directory that is non-empty, became
/// non-empty again, or cannot be removed is simply kept. The root itself
/// is never removed.
fn prune_empty_dirs(root: &Path) -> usize {
  let mut pruned = 0;

  for entry in WalkDir::new(root)
    .min_depth(1)
    .contents_first(true)
    .follow_links(false)
    .into_iter()
    .filter_map(|e| e.ok())
  {
    if !entry.file_type().is_dir() {
      continue;
    }

    if fs::remove_dir(entry.path()).is_ok() {
      debug!(path = %entry.path().display(), "pruned empty directory");
      pruned += 1;
    }
  }

  pruned
}
