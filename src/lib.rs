//! # srcmerge Library
//!
//! Walks a directory tree and merges every `.h` and `.cpp` file it finds into
//! a single output file. Each file is preceded by a delimiter line naming its
//! path and its bytes are copied unchanged:
//!
//! ```text
//!
//!
//! ===== src/main.cpp =====
//!
//! int main() {}
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use srcmerge::{Config, run_merge};
//! use std::path::PathBuf;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config {
//!         start_dir: PathBuf::from("."),
//!         output_path: PathBuf::from("merged_source_files.txt"),
//!         show_help: false,
//!         verbosity: 0,
//!     };
//!
//!     let summary = run_merge(&config)?;
//!     println!("{} files", summary.attempted);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod filewalker;
pub mod utils;
pub mod writer;

pub use cli::Config;
pub use filewalker::{TraversalEntry, walk_tree};
pub use utils::is_source_file;
pub use writer::SourceWriter;

use anyhow::{Context, Result, bail};
use log::{info, warn};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Tally of one merge run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    /// Matched files whose merge was started, including ones that failed.
    pub attempted: usize,
    /// Matched files whose contents could not be fully copied.
    pub failed: usize,
}

/// Merge all source files under `config.start_dir` into `config.output_path`.
///
/// Per-file read errors are reported on stderr and skipped. Anything else,
/// including an error while walking the tree, aborts the run; the output is
/// flushed first so content written so far is kept.
pub fn run_merge(config: &Config) -> Result<MergeSummary> {
    ensure_directory(&config.start_dir)?;

    let file = File::create(&config.output_path).with_context(|| {
        format!(
            "Cannot create output file '{}'",
            config.output_path.display()
        )
    })?;

    if is_source_file(&config.output_path) && utils::is_inside(&config.output_path, &config.start_dir)
    {
        warn!(
            "Output file '{}' is inside '{}' and matches the merge filter; it may be merged into itself",
            config.output_path.display(),
            config.start_dir.display()
        );
    }

    let mut writer = SourceWriter::new(BufWriter::new(file));

    println!(
        "Merging .h and .cpp files under '{}' into '{}'...",
        config.start_dir.display(),
        config.output_path.display()
    );

    merge_and_flush(walk_tree(&config.start_dir), &mut writer, &config.output_path)
}

/// Merges `entries`, then flushes `writer` and prints the summary whether or
/// not the merge finished.
fn merge_and_flush<I, W>(
    entries: I,
    writer: &mut SourceWriter<W>,
    output_path: &Path,
) -> Result<MergeSummary>
where
    I: IntoIterator<Item = Result<TraversalEntry>>,
    W: Write,
{
    let mut summary = MergeSummary::default();
    let merged = merge_entries(entries, writer, &mut summary);
    let flushed = writer.flush();

    println!(
        "Done: {} file(s) merged into '{}'",
        summary.attempted,
        output_path.display()
    );
    if summary.failed > 0 {
        info!(
            "{} of {} file(s) could not be copied completely",
            summary.failed, summary.attempted
        );
    }

    merged?;
    flushed?;
    Ok(summary)
}

fn ensure_directory(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => bail!("'{}' is not a directory", dir.display()),
        Err(err) => {
            Err(err).with_context(|| format!("Directory '{}' does not exist", dir.display()))
        }
    }
}

/// Merges every matching regular file among `entries` into `writer`.
///
/// Entries normally come from [`walk_tree`]. Stops at the first walk error.
pub fn merge_entries<I, W>(
    entries: I,
    writer: &mut SourceWriter<W>,
    summary: &mut MergeSummary,
) -> Result<()>
where
    I: IntoIterator<Item = Result<TraversalEntry>>,
    W: Write,
{
    for entry in entries {
        let entry = entry?;
        if entry.is_file && is_source_file(&entry.path) {
            merge_file(&entry.path, writer, summary)?;
        }
    }
    Ok(())
}

/// Appends one file to `writer`, preceded by its delimiter.
///
/// A failure to read the file is printed and counted, not returned; only a
/// failure to write the delimiter is an error.
pub fn merge_file<W: Write>(
    path: &Path,
    writer: &mut SourceWriter<W>,
    summary: &mut MergeSummary,
) -> Result<()> {
    summary.attempted += 1;
    println!("Processing: {}", path.display());

    writer.write_delimiter(path)?;

    if let Err(err) = writer.append_contents(path) {
        eprintln!("Error processing file '{}': {err:#}", path.display());
        summary.failed += 1;
    }
    Ok(())
}
