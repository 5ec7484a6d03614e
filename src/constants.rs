//! Shared constants and regex patterns.

use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// The optional-coalescing operator this tool removes.
pub const COALESCING_TOKEN: &str = "??";

/// Name of the configuration file searched for in the project root and above.
pub const CONFIG_FILENAME: &str = ".decoalesce.toml";

/// File extension of source units when none is configured.
pub const DEFAULT_EXTENSION: &str = "swift";

/// Regex for declaration lines: `let|var <name> [: <type>] = <expr>`.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"^(?P<kw>let|var)\s+(?P<name>\w+)(?:\s*:\s*(?P<ty>[^=]+?))?\s*=\s*(?P<expr>.+)$")
            .expect("Invalid declaration regex pattern")
    })
}

/// Regex for return lines: `return <expr>`.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_return_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"^return\s+(?P<expr>.+)$").expect("Invalid return regex pattern")
    })
}

/// Regex for bare assignment lines: `<target> = <expr>` with no declaration keyword.
/// The target may be a dotted or subscripted place expression (`self.cache[key]`).
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_assign_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"^(?P<target>[\w.\[\]]+)\s*=\s*(?P<expr>.+)$")
            .expect("Invalid assignment regex pattern")
    })
}

/// Set of folder names excluded from directory enumeration by default.
pub fn get_default_exclude_folders() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert(".git");
        s.insert(".build");
        s.insert(".swiftpm");
        s.insert("Pods");
        s.insert("Carthage");
        s.insert("DerivedData");
        s.insert("node_modules");
        s
    })
}
