//! Line-oriented rewriting of optional-coalescing expressions.
//!
//! The rewriter scans source text line by line. A line containing exactly one
//! `??` operator in a recognizable position (declaration, return, or bare
//! assignment) is replaced by an explicit conditional block with matching
//! indentation. Everything else is left byte-for-byte unchanged and reported
//! as unresolved, so no occurrence is ever silently dropped.
//!
//! This is a best-effort textual heuristic, not a parser. Multi-line
//! expressions, chained coalescing, and call-argument occurrences are outside
//! its contract by design.

mod rules;

use rules::{LineRewrite, LineRules};
use serde::Serialize;
use std::fmt;

/// Policy for lines whose left-hand side is a deep optional chain
/// (two or more `?` markers, e.g. `user?.profile?.name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewritePolicy {
    /// Refuse deep chains and report them as unresolved.
    #[default]
    Conditional,
    /// Hoist the chained expression into a synthetically-named temporary
    /// (`tempValue0`, `tempValue1`, ...) declared on the preceding lines.
    Hoist,
}

/// Why a line containing the coalescing token was left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// More than one `??` on the line (chained/nested coalescing).
    NestedCoalescing,
    /// Left-hand side is a deep optional chain the heuristic refuses.
    DeepOptionalChain,
    /// The token sits inside a parenthesized argument list.
    InsideCallArguments,
    /// No declaration, return, or assignment target could be identified.
    NoRecognizableTarget,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NestedCoalescing => "nested coalescing chain",
            Self::DeepOptionalChain => "deep optional chain",
            Self::InsideCallArguments => "inside call arguments",
            Self::NoRecognizableTarget => "no recognizable target",
        };
        f.write_str(msg)
    }
}

/// A line that still carries the coalescing token after rewriting.
#[derive(Debug, Clone, Serialize)]
pub struct UnresolvedLine {
    /// 1-indexed line number in the original source.
    pub line: usize,
    /// Why the line was left unchanged.
    pub reason: SkipReason,
}

/// Result of rewriting one source unit.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// The full rewritten text. Equal to the input when nothing matched.
    pub text: String,
    /// Number of coalescing expressions that were expanded.
    pub substitutions: usize,
    /// Lines that keep the token, with the reason each was skipped.
    pub unresolved: Vec<UnresolvedLine>,
}

/// Rewrites all safely-recognizable coalescing expressions in `source`.
///
/// Untouched lines are carried over verbatim, so running the rewriter over
/// its own output performs zero further substitutions.
#[must_use]
pub fn rewrite_source(source: &str, policy: RewritePolicy) -> RewriteOutcome {
    let mut rules = LineRules::new(policy);
    let mut out: Vec<String> = Vec::new();
    let mut substitutions = 0;
    let mut unresolved = Vec::new();

    for (idx, line) in source.split('\n').enumerate() {
        match rules.rewrite_line(line) {
            LineRewrite::Replaced(block) => {
                substitutions += 1;
                out.extend(block);
            }
            LineRewrite::Unresolved(reason) => {
                unresolved.push(UnresolvedLine {
                    line: idx + 1,
                    reason,
                });
                out.push(line.to_owned());
            }
            LineRewrite::Untouched => out.push(line.to_owned()),
        }
    }

    RewriteOutcome {
        text: out.join("\n"),
        substitutions,
        unresolved,
    }
}
