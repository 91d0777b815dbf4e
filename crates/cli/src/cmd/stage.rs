//! Implementation of the `artkeep stage` command.

use std::path::Path;

use anyhow::Result;

use artkeep_lib::stage::stage;

use crate::output::{OutputFormat, print_info, print_json, print_success};

pub fn cmd_stage(source: &Path, dest_dir: &Path, output: OutputFormat) -> Result<()> {
  let outcome = stage(source, dest_dir)?;

  if output.is_json() {
    print_json(&outcome)?;
  } else if outcome.copied {
    print_success(&format!(
      "Staged {} -> {}",
      source.display(),
      outcome.destination.display()
    ));
  } else {
    print_info(&format!(
      "Already up to date: {}",
      outcome.destination.display()
    ));
  }

  Ok(())
}
