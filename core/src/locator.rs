//! # Target Lookup
//!
//! Resolves the single file the patch run operates on by searching the
//! directory tree recursively for an exact file-name match.
//!
//! Zero matches and multiple matches are hard errors by default; taking
//! the first of several candidates is opt-in via `take_first`.

use crate::error::{AppError, AppResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects every file under `root` whose final component equals `file_name`.
///
/// Unreadable directory entries are skipped, matching the best-effort walk
/// semantics used elsewhere in the toolchain.
pub fn find_matches(root: &Path, file_name: &str) -> Vec<PathBuf> {
    let walker = WalkDir::new(root).into_iter();

    walker
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name() == file_name)
        .map(|e| e.into_path())
        .collect()
}

/// Resolves exactly one target path for `file_name` under `root`.
///
/// # Arguments
///
/// * `root` - Directory the recursive search starts from.
/// * `file_name` - Exact file name to look for.
/// * `take_first` - Accept the first match in walk order when several
///   files share the name, instead of failing.
///
/// # Errors
///
/// * `AppError::TargetNotFound` when nothing matches.
/// * `AppError::AmbiguousTarget` when more than one file matches and
///   `take_first` is false; the message lists every candidate.
pub fn locate_single(root: &Path, file_name: &str, take_first: bool) -> AppResult<PathBuf> {
    let mut matches = find_matches(root, file_name);

    match matches.len() {
        0 => Err(AppError::TargetNotFound(format!(
            "no file named '{}' under {:?}",
            file_name, root
        ))),
        1 => Ok(matches.remove(0)),
        _ if take_first => {
            // Legacy first-match selection, kept behind the explicit flag.
            Ok(matches.remove(0))
        }
        n => {
            let listing = matches
                .iter()
                .map(|p| format!("{:?}", p))
                .collect::<Vec<_>>()
                .join(", ");
            Err(AppError::AmbiguousTarget(format!(
                "{} files named '{}': {}",
                n, file_name, listing
            )))
        }
    }
}
