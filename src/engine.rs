//! The rewriting engine: work-list construction, per-file processing, and
//! run aggregation.
//!
//! Processing is deliberately sequential: each file is read, rewritten, and
//! conditionally written back before the next begins. Failures are contained
//! at single-file granularity; one bad file never aborts the run and there is
//! no rollback across the batch.

use crate::constants::{COALESCING_TOKEN, DEFAULT_EXTENSION};
use crate::rewrite::{rewrite_source, RewritePolicy, UnresolvedLine};
use crate::utils;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while processing a single work-list item.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The work-list entry does not point at an existing file.
    #[error("file does not exist")]
    Missing,
    /// The file could not be decoded as UTF-8 text.
    #[error("not valid UTF-8 text")]
    NotText,
    /// Reading the file failed.
    #[error("failed to read: {0}")]
    Read(std::io::Error),
    /// Writing the rewritten text back failed.
    #[error("failed to write: {0}")]
    Write(std::io::Error),
}

/// Outcome for one file. Explicit result type per item, aggregated by the
/// caller, instead of print-statement side effects.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// At least one substitution fired.
    Changed {
        /// Number of coalescing expressions expanded.
        substitutions: usize,
    },
    /// The file was scanned but nothing was rewritten.
    Unchanged,
    /// The file could not be processed; the run continues.
    Failed {
        /// Human-readable failure reason.
        error: String,
    },
}

/// Per-file report: outcome plus any lines left unresolved.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Normalized display path of the file.
    pub file: String,
    /// What happened to the file.
    #[serde(flatten)]
    pub outcome: FileOutcome,
    /// Lines still carrying the token, with skip reasons.
    pub unresolved: Vec<UnresolvedLine>,
}

/// Aggregate of one run over the whole work list.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// Whether files were actually written back (false = dry-run).
    pub applied: bool,
    /// Number of work-list items processed.
    pub files_scanned: usize,
    /// Number of files with at least one substitution.
    pub files_changed: usize,
    /// Number of files that failed to process.
    pub files_failed: usize,
    /// Sum of substitutions across all files.
    pub total_substitutions: usize,
    /// Total count of unresolved lines across all files.
    pub unresolved_lines: usize,
    /// The per-file reports, in work-list order.
    pub reports: Vec<FileReport>,
}

impl RunSummary {
    /// Creates an empty summary for a run in the given mode.
    #[must_use]
    pub fn new(applied: bool) -> Self {
        Self {
            applied,
            files_scanned: 0,
            files_changed: 0,
            files_failed: 0,
            total_substitutions: 0,
            unresolved_lines: 0,
            reports: Vec::new(),
        }
    }

    /// Folds one per-file report into the aggregate.
    pub fn record(&mut self, report: FileReport) {
        self.files_scanned += 1;
        match &report.outcome {
            FileOutcome::Changed { substitutions } => {
                self.files_changed += 1;
                self.total_substitutions += substitutions;
            }
            FileOutcome::Unchanged => {}
            FileOutcome::Failed { .. } => self.files_failed += 1,
        }
        self.unresolved_lines += report.unresolved.len();
        self.reports.push(report);
    }
}

/// Options controlling a run.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Rewrite policy for deep optional chains.
    pub policy: RewritePolicy,
    /// Write files back; false previews only.
    pub apply: bool,
    /// File extension of source units.
    pub extension: String,
    /// User-specified folders to exclude from enumeration.
    pub exclude_folders: Vec<String>,
    /// Folders to force-include (overrides excludes).
    pub include_folders: Vec<String>,
    /// Print walk diagnostics to stderr.
    pub verbose: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            policy: RewritePolicy::default(),
            apply: false,
            extension: DEFAULT_EXTENSION.to_owned(),
            exclude_folders: Vec::new(),
            include_folders: Vec::new(),
            verbose: false,
        }
    }
}

/// The engine itself: owns the options and the merged exclusion set.
pub struct Decoalesce {
    options: EngineOptions,
    excludes: Vec<String>,
}

impl Decoalesce {
    /// Creates an engine, merging default and user exclusions.
    #[must_use]
    pub fn new(options: EngineOptions) -> Self {
        let mut excludes: Vec<String> =
            utils::parse_exclude_folders(&options.exclude_folders, &options.include_folders)
                .into_iter()
                .collect();
        excludes.sort_unstable();
        Self { options, excludes }
    }

    /// The merged exclusion set applied during enumeration.
    #[must_use]
    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    /// Builds the work list from the given paths.
    ///
    /// Directories are enumerated (extension filter, exclusion set, then a
    /// content filter for the coalescing token); files are taken verbatim,
    /// in order. No paths at all means the current directory.
    #[must_use]
    pub fn build_work_list(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        if paths.is_empty() {
            return self.enumerate(Path::new("."));
        }

        let mut work_list = Vec::new();
        for path in paths {
            if path.is_dir() {
                work_list.extend(self.enumerate(path));
            } else {
                work_list.push(path.clone());
            }
        }
        work_list
    }

    fn enumerate(&self, root: &Path) -> Vec<PathBuf> {
        let (files, dir_count) = utils::collect_source_files_gitignore(
            root,
            &self.options.extension,
            &self.excludes,
            self.options.verbose,
        );

        if self.options.verbose {
            eprintln!(
                "[VERBOSE] Enumerated {} {} file(s) across {} directories under {}",
                files.len(),
                self.options.extension,
                dir_count,
                root.display()
            );
        }

        // Content filter: only files carrying the token become candidates.
        // Unreadable files stay on the list so processing surfaces the error.
        files
            .into_iter()
            .filter(|path| match fs::read_to_string(path) {
                Ok(content) => content.contains(COALESCING_TOKEN),
                Err(_) => true,
            })
            .collect()
    }

    /// Processes a single work-list item: read, rewrite, conditionally write.
    #[must_use]
    pub fn process_file(&self, path: &Path) -> FileReport {
        let file = utils::normalize_display_path(path);
        match self.try_process(path) {
            Ok((outcome, unresolved)) => FileReport {
                file,
                outcome,
                unresolved,
            },
            Err(e) => FileReport {
                file,
                outcome: FileOutcome::Failed {
                    error: e.to_string(),
                },
                unresolved: Vec::new(),
            },
        }
    }

    fn try_process(
        &self,
        path: &Path,
    ) -> Result<(FileOutcome, Vec<UnresolvedLine>), ProcessError> {
        if !path.exists() {
            return Err(ProcessError::Missing);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::InvalidData {
                ProcessError::NotText
            } else {
                ProcessError::Read(e)
            }
        })?;

        let outcome = rewrite_source(&content, self.options.policy);

        if outcome.substitutions > 0 && outcome.text != content {
            if self.options.apply {
                fs::write(path, &outcome.text).map_err(ProcessError::Write)?;
            }
            Ok((
                FileOutcome::Changed {
                    substitutions: outcome.substitutions,
                },
                outcome.unresolved,
            ))
        } else {
            Ok((FileOutcome::Unchanged, outcome.unresolved))
        }
    }

    /// Runs the full pipeline over the given paths and aggregates the result.
    /// Each file completes before the next begins.
    #[must_use]
    pub fn run_paths(&self, paths: &[PathBuf]) -> RunSummary {
        let work_list = self.build_work_list(paths);
        let mut summary = RunSummary::new(self.options.apply);
        for path in &work_list {
            summary.record(self.process_file(path));
        }
        summary
    }
}
