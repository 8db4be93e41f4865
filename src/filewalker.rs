use anyhow::{Context, Result};
use ignore::{DirEntry, WalkBuilder};
use std::path::{Component, Path, PathBuf};

/// One entry produced by the walk. Consumed immediately, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalEntry {
    pub path: PathBuf,
    pub is_dir: bool,
    /// True for regular files only; symlinks are not followed.
    pub is_file: bool,
}

impl From<DirEntry> for TraversalEntry {
    fn from(entry: DirEntry) -> Self {
        let file_type = entry.file_type();
        Self {
            is_dir: file_type.is_some_and(|t| t.is_dir()),
            is_file: file_type.is_some_and(|t| t.is_file()),
            path: strip_cur_dir(entry.into_path()),
        }
    }
}

/// Drops `.` components and redundant separators, so a walk from `.` yields
/// `a.cpp` rather than `./a.cpp`. A path made only of `.` is returned unchanged.
fn strip_cur_dir(path: PathBuf) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    if cleaned.as_os_str().is_empty() {
        path
    } else {
        cleaned
    }
}

/// Walks every entry under `start_dir`, the root included.
///
/// Nothing is filtered out: hidden files and ignore files are not consulted.
/// Entries of each directory come in file name order. A walk error is yielded
/// as `Err` and it is up to the caller whether to keep going.
pub fn walk_tree(start_dir: &Path) -> impl Iterator<Item = Result<TraversalEntry>> {
    let mut builder = WalkBuilder::new(start_dir);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    builder.build().map(|result| {
        result
            .map(TraversalEntry::from)
            .context("Failed to walk directory tree")
    })
}
