//! Path utilities: display normalization, exclusion matching, and
//! gitignore-aware source file discovery.

/// Normalizes a path for CLI display.
///
/// - Converts backslashes to forward slashes (for cross-platform consistency)
/// - Strips leading "./" or ".\" prefix (for cleaner output)
#[must_use]
pub fn normalize_display_path(path: &std::path::Path) -> String {
    let s = path.to_string_lossy();
    // Strip Windows extended path prefix if present
    let clean = s.trim_start_matches(r"\\?\");
    let normalized = clean.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

/// Checks if a name matches any exclusion pattern.
/// Supports exact matching and wildcard patterns starting with `*.`.
#[must_use]
pub fn is_excluded(name: &str, excludes: &[String]) -> bool {
    for exclude in excludes {
        if exclude.starts_with("*.") {
            if name.ends_with(&exclude[1..]) {
                return true;
            }
        } else if name == exclude {
            return true;
        }
    }
    false
}

/// Collects source files with the given extension from a directory.
///
/// Uses the `ignore` crate to respect .gitignore, .git/info/exclude, and
/// global gitignore IN ADDITION to the exclusion set built from the defaults
/// and user options.
///
/// # Returns
/// Tuple of (`PathBuf` vector for all matching files, directory count)
#[must_use]
pub fn collect_source_files_gitignore(
    root: &std::path::Path,
    extension: &str,
    exclude: &[String],
    verbose: bool,
) -> (Vec<std::path::PathBuf>, usize) {
    use ignore::WalkBuilder;

    let excludes_for_filter: Vec<String> = exclude.to_vec();
    let root_for_filter = root.to_path_buf();

    // Add filter_entry to skip excluded directories at traversal time,
    // preventing descent into Pods, .build, DerivedData, etc.
    let walker = WalkBuilder::new(root)
        .hidden(false) // Don't skip hidden files (the exclusion set handles dot dirs)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(move |entry| {
            // Always allow the root directory
            if entry.path() == root_for_filter {
                return true;
            }

            // Only filter directories - files are filtered by extension later
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }

            if let Some(name) = entry.file_name().to_str() {
                if is_excluded(name, &excludes_for_filter) {
                    return false;
                }
            }

            true
        })
        .build();

    let mut files = Vec::new();
    let mut dir_count = 0;

    for result in walker {
        match result {
            Ok(entry) => {
                let path = entry.path();

                if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    if path != root {
                        dir_count += 1;
                    }
                    continue;
                }

                if path.extension().is_some_and(|ext| ext == extension) {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => {
                if verbose {
                    eprintln!("Walk error: {e}");
                }
            }
        }
    }

    files.sort();
    (files, dir_count)
}
