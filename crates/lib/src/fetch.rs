//! The external cache-by-key fetch capability.
//!
//! Fetching is consumed, not implemented, by this crate: given a target
//! identifier, the capability must leave the artifact materialized at the
//! target's path, whether that means downloading it from a remote cache or
//! triggering and waiting on the build step that produces it. Modeling it
//! as a trait keeps the prerequisite resolver testable with an in-memory
//! fake.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

/// Errors from a fetch attempt. Every variant is fatal to the resolution
/// that requested it; a missing prerequisite only fails later and worse.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("failed to run fetch command for target '{target}': {source}")]
  Spawn {
    target: String,
    #[source]
    source: std::io::Error,
  },

  #[error("fetch command for target '{target}' exited with {status}")]
  CommandFailed {
    target: String,
    status: std::process::ExitStatus,
  },

  /// The fetch command reported success but the artifact is not on disk.
  #[error("fetch reported success but target was not materialized: {target}")]
  NotMaterialized { target: String },
}

/// A capability that materializes one target on the local filesystem.
pub trait TargetFetcher {
  fn fetch(&self, target: &str) -> Result<(), FetchError>;
}

/// Fetches targets by delegating to an external command.
///
/// Runs `program [args..] <target>` in `workdir` and then verifies that
/// `workdir/<target>` exists. This is how the cache client and the build
/// system are actually driven: both accept a target path argument and
/// populate that path on success.
#[derive(Debug, Clone)]
pub struct CommandFetcher {
  program: String,
  args: Vec<String>,
  workdir: PathBuf,
}

impl CommandFetcher {
  pub fn new(program: impl Into<String>, args: Vec<String>, workdir: &Path) -> Self {
    CommandFetcher {
      program: program.into(),
      args,
      workdir: workdir.to_path_buf(),
    }
  }
}

impl TargetFetcher for CommandFetcher {
  fn fetch(&self, target: &str) -> Result<(), FetchError> {
    debug!(target, program = %self.program, "fetching target");

    let status = Command::new(&self.program)
      .args(&self.args)
      .arg(target)
      .current_dir(&self.workdir)
      .status()
      .map_err(|e| FetchError::Spawn {
        target: target.to_string(),
        source: e,
      })?;

    if !status.success() {
      return Err(FetchError::CommandFailed {
        target: target.to_string(),
        status,
      });
    }

    if !self.workdir.join(target).exists() {
      return Err(FetchError::NotMaterialized {
        target: target.to_string(),
      });
    }

    info!(target, "fetched target");
    Ok(())
  }
}
