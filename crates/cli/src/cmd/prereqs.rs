//! Implementation of the `artkeep prereqs` command.
//!
//! Resolves the target set a minimal CI build needs and fetches each
//! member through the configured fetch command, failing fast on the first
//! error. `--list` previews the resolved set without fetching.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};

use artkeep_lib::fetch::CommandFetcher;
use artkeep_lib::prereq::{PatternRule, default_rules, fetch_prereqs, resolve_prereqs};

use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success};

pub fn cmd_prereqs(
  meta_manifests: &[PathBuf],
  targets: Vec<String>,
  rules: Vec<PatternRule>,
  list: bool,
  fetch_with: &[String],
  workdir: &Path,
  output: OutputFormat,
) -> Result<()> {
  let start = Instant::now();

  let rules = if rules.is_empty() { default_rules() } else { rules };
  let fixed: BTreeSet<String> = targets.into_iter().collect();

  let needed = resolve_prereqs(meta_manifests, &fixed, &rules)?;

  if list {
    if output.is_json() {
      print_json(&needed)?;
    } else {
      for target in &needed {
        println!("{}", target);
      }
    }
    return Ok(());
  }

  let (program, args) = fetch_with
    .split_first()
    .context("No fetch command given (use --fetch-with)")?;

  let workdir = dunce::canonicalize(workdir)
    .with_context(|| format!("Failed to resolve working directory: {}", workdir.display()))?;

  let fetcher = CommandFetcher::new(program.as_str(), args.to_vec(), &workdir);
  let count = fetch_prereqs(&needed, &fetcher)?;

  if output.is_json() {
    print_json(&serde_json::json!({ "fetched": count }))?;
  } else {
    print_success("Prerequisites fetched!");
    print_stat("Targets fetched", &count.to_string());
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  Ok(())
}
