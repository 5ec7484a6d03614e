//! Core library for the `decoalesce` rewriting tool.
//!
//! decoalesce scans Swift source trees for the optional-coalescing operator
//! (`??`) and rewrites each safely-recognizable occurrence into an equivalent
//! explicit `if let` / `else` block, in place. It is a best-effort,
//! line-oriented rewriter: ambiguous occurrences are left untouched and
//! reported rather than guessed at.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants and regex patterns.
pub mod constants;

/// Module containing the engine that drives the read-rewrite-write pipeline.
pub mod engine;

/// Module defining the entry point logic shared by the binary and tests.
pub mod entry_point;

/// Module for rich CLI output formatting with colored text and progress bars.
pub mod output;

/// Module containing the line-oriented rewriting heuristic.
pub mod rewrite;

/// Module containing utility functions.
pub mod utils;
