//! Declared-artifact manifests.
//!
//! A manifest is a JSON array of path strings, each relative to a build
//! output root. Artifacts are partitioned into independently maintained
//! manifests (typically a public and a private one); loading merges any
//! number of them by set union, so anything declared by any partition
//! counts as legitimate.
//!
//! Meta-manifests (lists of target identifiers produced by a generation
//! pass) use the same wire format and are loaded through the same type.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading manifests.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// A manifest file could not be read.
  #[error("failed to read manifest '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A manifest file was not a JSON array of strings.
  #[error("failed to parse manifest '{path}': {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// A merged set of declared artifact paths.
///
/// Entries are root-relative and use `/` as the separator regardless of
/// platform; backslashes are normalized on load so that membership checks
/// against scanner output are valid everywhere.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
  entries: BTreeSet<String>,
}

impl Manifest {
  /// Load and union any number of manifest files.
  ///
  /// Fails on the first file that is missing or not parseable; nothing
  /// is mutated on disk, so a load failure always aborts cleanly.
  pub fn load(paths: &[PathBuf]) -> Result<Self, ManifestError> {
    let mut entries = BTreeSet::new();

    for path in paths {
      let raw = fs::read_to_string(path).map_err(|e| ManifestError::Read {
        path: path.clone(),
        source: e,
      })?;

      let listed: Vec<String> = serde_json::from_str(&raw).map_err(|e| ManifestError::Parse {
        path: path.clone(),
        source: e,
      })?;

      debug!(path = %path.display(), count = listed.len(), "loaded manifest");

      entries.extend(listed.into_iter().map(|p| normalize_entry(&p)));
    }

    Ok(Manifest { entries })
  }

  pub fn from_entries<I, S>(entries: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Manifest {
      entries: entries.into_iter().map(|e| normalize_entry(e.as_ref())).collect(),
    }
  }

  pub fn contains(&self, entry: &str) -> bool {
    self.entries.contains(entry)
  }

  pub fn entries(&self) -> &BTreeSet<String> {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// Normalize a manifest entry to `/` separators.
fn normalize_entry(entry: &str) -> String {
  if entry.contains('\\') {
    entry.replace('\\', "/")
  } else {
    entry.to_string()
  }
}
