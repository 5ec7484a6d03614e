//! Utility functions shared across the crate.

mod paths;

pub use paths::{collect_source_files_gitignore, is_excluded, normalize_display_path};

use crate::constants::get_default_exclude_folders;
use rustc_hash::FxHashSet;

/// Parses exclude folders, combining defaults with user inputs.
/// Force-included folders are removed from the result.
pub fn parse_exclude_folders(
    user_exclude_folders: &[String],
    include_folders: &[String],
) -> FxHashSet<String> {
    let mut exclude_folders: FxHashSet<String> = get_default_exclude_folders()
        .iter()
        .map(|&s| s.to_owned())
        .collect();

    exclude_folders.extend(user_exclude_folders.iter().cloned());

    for folder in include_folders {
        exclude_folders.remove(folder);
    }

    exclude_folders
}
