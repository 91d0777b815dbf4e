use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use artkeep_lib::prereq::PatternRule;

use crate::output::OutputFormat;

mod cmd;
mod output;

/// artkeep - build-artifact lifecycle manager
#[derive(Parser)]
#[command(name = "artkeep")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Remove artifacts under a build-output root that no manifest declares
  Clean {
    /// Build-output root to reconcile
    #[arg(long)]
    root: PathBuf,

    /// Declared-artifact manifest (repeat for each partition)
    #[arg(long = "manifest", required = true)]
    manifests: Vec<PathBuf>,

    /// Report what would be removed without touching anything
    #[arg(long)]
    dry_run: bool,

    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Copy a freshly built artifact into a staging directory if it is newer
  Stage {
    /// The built artifact to stage
    source: PathBuf,

    /// Directory to stage it into
    dest_dir: PathBuf,

    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Resolve and fetch the targets a minimal CI build needs
  Prereqs {
    /// Meta-manifest of generated targets (repeat for each partition)
    #[arg(long = "meta-manifest", required = true)]
    meta_manifests: Vec<PathBuf>,

    /// Always-needed target, independent of the meta-manifests (repeatable)
    #[arg(long = "target")]
    targets: Vec<String>,

    /// Generated-area rule as PREFIX:INFIX (defaults to the stock rules)
    #[arg(long = "rule")]
    rules: Vec<PatternRule>,

    /// Print the resolved target set without fetching
    #[arg(long)]
    list: bool,

    /// Fetch command; the target path is appended as the last argument
    #[arg(long = "fetch-with", num_args = 1.., required_unless_present = "list")]
    fetch_with: Vec<String>,

    /// Working directory for the fetch command and target paths
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Clean {
      root,
      manifests,
      dry_run,
      output,
    } => cmd::cmd_clean(&root, &manifests, dry_run, output),
    Commands::Stage {
      source,
      dest_dir,
      output,
    } => cmd::cmd_stage(&source, &dest_dir, output),
    Commands::Prereqs {
      meta_manifests,
      targets,
      rules,
      list,
      fetch_with,
      workdir,
      output,
    } => cmd::cmd_prereqs(&meta_manifests, targets, rules, list, &fetch_with, &workdir, output),
  }
}
