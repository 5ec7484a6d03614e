//! Rich CLI output formatting: per-file status lines, the summary table,
//! and the progress bar.

use crate::engine::{FileOutcome, FileReport, RunSummary};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;

/// Print the run mode banner.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_run_mode(writer: &mut impl Write, applied: bool) -> std::io::Result<()> {
    if applied {
        writeln!(writer, "{}", "Applying rewrites...".cyan())
    } else {
        writeln!(
            writer,
            "{}",
            "[DRY-RUN] Previewing rewrites (use --apply to modify files):".yellow()
        )
    }
}

/// Print the status line for one processed file, plus its unresolved lines.
///
/// Unchanged files are shown only in verbose mode; unresolved occurrences are
/// always surfaced.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_file_report(
    writer: &mut impl Write,
    report: &FileReport,
    applied: bool,
    verbose: bool,
) -> std::io::Result<()> {
    match &report.outcome {
        FileOutcome::Changed { substitutions } => {
            if applied {
                writeln!(
                    writer,
                    "  {} {} ({} substitutions)",
                    "Rewrote:".green(),
                    report.file,
                    substitutions
                )?;
            } else {
                writeln!(
                    writer,
                    "  Would rewrite {} ({} substitutions)",
                    report.file, substitutions
                )?;
            }
        }
        FileOutcome::Unchanged => {
            if verbose {
                writeln!(writer, "  {} {}", "Unchanged:".dimmed(), report.file)?;
            }
        }
        FileOutcome::Failed { error } => {
            writeln!(writer, "  {} {}: {}", "Error:".red(), report.file, error)?;
        }
    }

    for unresolved in &report.unresolved {
        writeln!(
            writer,
            "  {} {}:{} ({})",
            "Unresolved:".yellow(),
            report.file,
            unresolved.line,
            unresolved.reason
        )?;
    }

    Ok(())
}

/// Print the aggregate summary, with a table of changed files in non-quiet
/// mode.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary(
    writer: &mut impl Write,
    summary: &RunSummary,
    quiet: bool,
) -> std::io::Result<()> {
    if !quiet && summary.files_changed > 0 {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![Cell::new("File"), Cell::new("Substitutions")]);
        for report in &summary.reports {
            if let FileOutcome::Changed { substitutions } = &report.outcome {
                table.add_row(vec![
                    Cell::new(&report.file),
                    Cell::new(substitutions.to_string()),
                ]);
            }
        }
        writeln!(writer, "{table}")?;
    }

    let verb = if summary.applied {
        "changed"
    } else {
        "would change"
    };
    writeln!(
        writer,
        "{} {} of {} file(s) {}, {} substitution(s), {} unresolved line(s), {} error(s)",
        "Done!".green().bold(),
        summary.files_changed,
        summary.files_scanned,
        verb,
        summary.total_substitutions,
        summary.unresolved_lines,
        summary.files_failed
    )
}

/// Create a progress bar over the work list.
///
/// In test mode, returns a hidden progress bar to avoid polluting test output.
#[must_use]
pub fn create_progress_bar(total_files: u64) -> ProgressBar {
    if cfg!(test) {
        return ProgressBar::hidden();
    }

    let pb =
        ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stderr_with_hz(20));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message("rewriting...");
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed(file: &str, substitutions: usize) -> FileReport {
        FileReport {
            file: file.to_owned(),
            outcome: FileOutcome::Changed { substitutions },
            unresolved: Vec::new(),
        }
    }

    #[test]
    fn test_print_file_report_dry_run() {
        let mut buffer = Vec::new();
        print_file_report(&mut buffer, &changed("A.swift", 2), false, false).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("Would rewrite A.swift (2 substitutions)"));
    }

    #[test]
    fn test_print_file_report_unchanged_only_verbose() {
        let report = FileReport {
            file: "B.swift".to_owned(),
            outcome: FileOutcome::Unchanged,
            unresolved: Vec::new(),
        };

        let mut buffer = Vec::new();
        print_file_report(&mut buffer, &report, false, false).unwrap();
        assert!(buffer.is_empty());

        let mut buffer = Vec::new();
        print_file_report(&mut buffer, &report, false, true).unwrap();
        assert!(String::from_utf8(buffer).unwrap().contains("B.swift"));
    }

    #[test]
    fn test_print_summary_counts() {
        let mut summary = RunSummary::new(true);
        summary.record(changed("A.swift", 3));
        summary.record(FileReport {
            file: "C.swift".to_owned(),
            outcome: FileOutcome::Failed {
                error: "file does not exist".to_owned(),
            },
            unresolved: Vec::new(),
        });

        let mut buffer = Vec::new();
        print_summary(&mut buffer, &summary, true).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("1 of 2 file(s) changed"));
        assert!(output.contains("3 substitution(s)"));
        assert!(output.contains("1 error(s)"));
    }
}
