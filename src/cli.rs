use crate::rewrite::RewritePolicy;
use clap::{Args, Parser};
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.decoalesce.toml):
  Create this file in your project root to set defaults.

  [decoalesce]
  policy = \"conditional\"     # or \"hoist\" (hoist deep chains into temporaries)
  extension = \"swift\"        # file extension of source units
  apply = false              # true rewrites files without requiring --apply

  # Path filters
  exclude_folders = [\"Generated\", \"Vendor\"]
  include_folders = [\"Pods\"]  # Force-include these
";

/// Shared path arguments (mutually exclusive paths/root).
#[derive(Args, Debug, Default, Clone)]
pub struct PathArgs {
    /// Paths to rewrite (files or directories).
    /// Directories are enumerated for source files containing the `??`
    /// operator; files are taken verbatim as the work list.
    /// When no paths are provided, defaults to the current directory.
    /// Cannot be used with --root.
    #[arg(conflicts_with = "root")]
    pub paths: Vec<PathBuf>,

    /// Project root to enumerate, when running from a different directory.
    /// Cannot be used together with positional path arguments.
    #[arg(long, conflicts_with = "paths")]
    pub root: Option<PathBuf>,
}

/// Options for output formatting and verbosity.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputOptions {
    /// Output raw JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output (shows the work list and unresolved reasons).
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: show only the aggregate summary line.
    #[arg(long)]
    pub quiet: bool,
}

/// Command line interface configuration using `clap`.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "decoalesce - Rewrite Swift nil-coalescing (`??`) expressions into explicit if/else blocks",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// Path options (paths vs root).
    #[command(flatten)]
    pub paths: PathArgs,

    /// Apply the rewrites to files.
    /// Without this flag, a preview of what would change is shown (dry-run).
    #[arg(short = 'a', long)]
    pub apply: bool,

    /// Rewrite policy for deep optional chains (overrides config).
    #[arg(long, value_enum)]
    pub policy: Option<RewritePolicy>,

    /// File extension of source units (overrides config; default "swift").
    #[arg(long)]
    pub extension: Option<String>,

    /// Folders to exclude from enumeration.
    #[arg(long, alias = "exclude-folder")]
    pub exclude_folders: Vec<String>,

    /// Folders to force-include in enumeration (overrides default exclusions).
    #[arg(long, alias = "include-folder")]
    pub include_folders: Vec<String>,

    /// Output formatting options.
    #[command(flatten)]
    pub output: OutputOptions,
}
