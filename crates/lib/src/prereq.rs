//! Prerequisite resolution for minimal CI builds.
//!
//! A full build pulls generated files and prefab binaries through the
//! normal build graph, but a minimal CI environment has to provision them
//! up front. The resolver scans the meta-manifests (lists of generated
//! target identifiers), keeps the entries that fall in a generated-code
//! area, unions them with a fixed set of always-needed targets, and
//! fetches every member of the result.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::info;

use crate::fetch::{FetchError, TargetFetcher};
use crate::manifest::{Manifest, ManifestError};

/// A directory-pattern rule over target identifiers.
///
/// A target matches when it starts with `prefix` and contains `infix`
/// somewhere after it. The two stock rules select generated native
/// sources and generated binding modules; see [`default_rules`].
#[derive(Debug, Clone, PartialEq)]
pub struct PatternRule {
  pub prefix: String,
  pub infix: String,
}

#[derive(Debug, Error)]
#[error("pattern rule must be of the form PREFIX:INFIX, got '{0}'")]
pub struct RuleParseError(String);

impl PatternRule {
  pub fn new(prefix: impl Into<String>, infix: impl Into<String>) -> Self {
    PatternRule {
      prefix: prefix.into(),
      infix: infix.into(),
    }
  }

  pub fn matches(&self, target: &str) -> bool {
    target.starts_with(&self.prefix) && target.contains(&self.infix)
  }
}

impl FromStr for PatternRule {
  type Err = RuleParseError;

  fn from_str(spec: &str) -> Result<Self, Self::Err> {
    match spec.split_once(':') {
      Some((prefix, infix)) if !prefix.is_empty() && !infix.is_empty() => {
        Ok(PatternRule::new(prefix, infix))
      }
      _ => Err(RuleParseError(spec.to_string())),
    }
  }
}

/// The stock rules: generated native sources and headers, and generated
/// bound-language modules.
pub fn default_rules() -> Vec<PatternRule> {
  vec![
    PatternRule::new("src/native/", "/mgen/"),
    PatternRule::new("src/assets/python/", "/_mgen/"),
  ]
}

/// Compute the full prerequisite target set.
///
/// Pure with respect to the fetch capability: only reads meta-manifests.
/// Set semantics dedupe targets listed in more than one partition, so
/// nothing is ever fetched twice.
pub fn resolve_prereqs(
  meta_manifests: &[PathBuf],
  fixed_targets: &BTreeSet<String>,
  rules: &[PatternRule],
) -> Result<BTreeSet<String>, ManifestError> {
  let meta = Manifest::load(meta_manifests)?;

  let mut needed = fixed_targets.clone();
  needed.extend(
    meta
      .entries()
      .iter()
      .filter(|target| rules.iter().any(|rule| rule.matches(target)))
      .cloned(),
  );

  Ok(needed)
}

/// Fetch every target in the set, aborting on the first failure.
///
/// Fetches are independent and order-insensitive, but partial success is
/// not a state worth continuing from: a missing prerequisite makes the
/// later build fail with a worse error, so the first fetch error wins.
pub fn fetch_prereqs(
  targets: &BTreeSet<String>,
  fetcher: &dyn TargetFetcher,
) -> Result<usize, FetchError> {
  for target in targets {
    fetcher.fetch(target)?;
  }

  info!(count = targets.len(), "fetched all prerequisite targets");
  Ok(targets.len())
}
