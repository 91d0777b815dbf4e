//! Implementation of the `artkeep clean` command.
//!
//! Reconciles a build-output root against the declared-artifact manifests
//! under an exclusive root lock, removing orphans and pruning emptied
//! directories.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use artkeep_lib::lock::{LockMode, RootLock};
use artkeep_lib::reconcile::clean_orphans;

use crate::output::{
  OutputFormat, format_bytes, format_duration, print_info, print_json, print_removed, print_stat,
  print_success,
};

pub fn cmd_clean(root: &Path, manifests: &[PathBuf], dry_run: bool, output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  let root = dunce::canonicalize(root)
    .with_context(|| format!("Failed to resolve build root: {}", root.display()))?;

  let _lock = RootLock::acquire(&root, LockMode::Exclusive, "clean")
    .context("Failed to acquire build-root lock")?;

  let result = clean_orphans(&root, manifests, dry_run)?;

  if output.is_json() {
    print_json(&result)?;
  } else {
    for removed in &result.removed {
      print_removed(removed);
    }
    println!();
    if dry_run {
      print_info("Dry run - no changes made");
    } else {
      print_success("Orphan cleanup complete!");
    }
    print_stat("Files removed", &result.stats.files_removed.to_string());
    print_stat("Dirs pruned", &result.stats.dirs_pruned.to_string());
    print_stat("Space freed", &format_bytes(result.stats.bytes_freed));
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  Ok(())
}
