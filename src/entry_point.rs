//! Shared entry point for the CLI binary.
//!
//! Argument parsing, config merging, and run orchestration live here so the
//! binary stays a thin shim and integration tests can capture output.

use crate::cli::Cli;
use crate::config::Config;
use crate::constants::DEFAULT_EXTENSION;
use crate::engine::{Decoalesce, EngineOptions, RunSummary};
use crate::output;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Run decoalesce with the given arguments, writing to stdout.
///
/// # Errors
///
/// Returns an error if writing output fails. Per-file failures are contained
/// and reported; they never produce an error or a non-zero exit code.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run decoalesce with the given arguments, writing output to the specified
/// writer. This is the testable version of `run_with_args`.
///
/// # Errors
///
/// Returns an error if writing output fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["decoalesce".to_owned()];
    program_args.extend(args);
    let cli = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => {
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    // Let clap print help/version as intended, but captured by redirect
                    write!(writer, "{e}")?;
                    writer.flush()?;
                    return Ok(0);
                }
                _ => {
                    eprint!("{e}");
                    return Ok(1);
                }
            }
        }
    };

    // Resolve the target paths; --root is just a single-directory work list.
    let paths: Vec<PathBuf> = match cli.paths.root {
        Some(root) => {
            if !root.is_dir() {
                eprintln!("Error: The directory '{}' does not exist.", root.display());
                return Ok(1);
            }
            vec![root]
        }
        None => cli.paths.paths,
    };

    // Load config from the first path or current directory
    let config_base = paths
        .first()
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    let config = Config::load_from_path(&config_base);

    let policy = cli
        .policy
        .or(config.decoalesce.policy)
        .unwrap_or_default();
    let extension = cli
        .extension
        .or(config.decoalesce.extension)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_owned());
    let apply = cli.apply || config.decoalesce.apply.unwrap_or(false);

    let mut exclude_folders = config.decoalesce.exclude_folders.unwrap_or_default();
    exclude_folders.extend(cli.exclude_folders);
    let mut include_folders = config.decoalesce.include_folders.unwrap_or_default();
    include_folders.extend(cli.include_folders);

    let verbose = cli.output.verbose;
    if verbose && !cli.output.json {
        eprintln!("[VERBOSE] decoalesce v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("[VERBOSE] Policy: {policy:?}");
        if let Some(path) = &config.config_file_path {
            eprintln!("[VERBOSE] Config: {}", path.display());
        }
    }

    let engine = Decoalesce::new(EngineOptions {
        policy,
        apply,
        extension,
        exclude_folders,
        include_folders,
        verbose,
    });

    if verbose && !cli.output.json {
        eprintln!("[VERBOSE] Excludes: {:?}", engine.excludes());
    }

    let work_list = engine.build_work_list(&paths);

    if cli.output.json {
        let mut summary = RunSummary::new(apply);
        for path in &work_list {
            summary.record(engine.process_file(path));
        }
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(0);
    }

    if !cli.output.quiet {
        output::print_run_mode(writer, apply)?;
    }

    let progress = output::create_progress_bar(work_list.len() as u64);
    let mut summary = RunSummary::new(apply);
    for path in &work_list {
        let report = engine.process_file(path);
        if !cli.output.quiet {
            output::print_file_report(writer, &report, apply, verbose)?;
        }
        summary.record(report);
        progress.inc(1);
    }
    progress.finish_and_clear();

    output::print_summary(writer, &summary, cli.output.quiet)?;

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_dry_run_summary() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("A.swift"), "let x = a ?? b\n").unwrap();

        let mut buffer = Vec::new();
        let code = run_with_args_to(
            vec!["--root".to_owned(), dir.path().display().to_string()],
            &mut buffer,
        )
        .unwrap();

        assert_eq!(code, 0);
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("[DRY-RUN]"));
        assert!(output.contains("Would rewrite"));
        assert!(output.contains("1 of 1 file(s) would change"));
    }

    #[test]
    fn test_run_missing_root() {
        let mut buffer = Vec::new();
        let code = run_with_args_to(
            vec!["--root".to_owned(), "/no/such/dir".to_owned()],
            &mut buffer,
        )
        .unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_run_json_output() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("A.swift"), "return v ?? 0\n").unwrap();

        let mut buffer = Vec::new();
        let code = run_with_args_to(
            vec![
                "--root".to_owned(),
                dir.path().display().to_string(),
                "--json".to_owned(),
            ],
            &mut buffer,
        )
        .unwrap();

        assert_eq!(code, 0);
        let parsed: serde_json::Value =
            serde_json::from_slice(&buffer).expect("output should be valid JSON");
        assert_eq!(parsed["files_changed"], 1);
        assert_eq!(parsed["total_substitutions"], 1);
        assert_eq!(parsed["applied"], false);
    }

    #[test]
    fn test_run_apply_writes_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("A.swift");
        std::fs::write(&file, "let x = a ?? b\n").unwrap();

        let mut buffer = Vec::new();
        let code = run_with_args_to(
            vec![
                "--root".to_owned(),
                dir.path().display().to_string(),
                "--apply".to_owned(),
            ],
            &mut buffer,
        )
        .unwrap();

        assert_eq!(code, 0);
        assert!(!std::fs::read_to_string(&file).unwrap().contains("??"));
    }

    #[test]
    fn test_config_policy_respected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(crate::constants::CONFIG_FILENAME),
            "[decoalesce]\npolicy = \"hoist\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("A.swift"),
            "let t = a?.b?.c ?? d\n",
        )
        .unwrap();

        let mut buffer = Vec::new();
        run_with_args_to(
            vec![
                "--root".to_owned(),
                dir.path().display().to_string(),
                "--json".to_owned(),
            ],
            &mut buffer,
        )
        .unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        // Hoist policy resolves the deep chain instead of skipping it
        assert_eq!(parsed["total_substitutions"], 1);
        assert_eq!(parsed["unresolved_lines"], 0);
    }
}
