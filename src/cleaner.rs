//! Deletion passes: per-cycle cleanup and whole-directory wipes.

use crate::config::Settings;
use crate::error::TidyError;
use crate::patterns::{find_stale, ChunkOutput};
use colored::Colorize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Completion callback supplied by the host pipeline. The pipeline
/// sequences cycles itself and waits on this before advancing, so every
/// pass must invoke it exactly once.
pub type Continuation = Box<dyn FnOnce()>;

/// Per-candidate result of a cleanup pass. A failed removal is carried by
/// the pass's `Err`, not by an outcome variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The file was removed from disk.
    Deleted(PathBuf),
    /// Dry run: the file would have been removed.
    Reported(PathBuf),
}

fn deleted_marker() -> String {
    " DELETED ".green().reversed().to_string()
}

fn dry_delete_marker() -> String {
    format!("{} {}", "[dry-run]".yellow(), " DELETE ".yellow().reversed())
}

fn clean_marker() -> String {
    " CLEAN ".green().reversed().to_string()
}

fn dry_clean_marker() -> String {
    format!("{} {}", "[dry-run]".yellow(), " CLEAN ".yellow().reversed())
}

fn basename(path: &Path) -> std::borrow::Cow<'_, str> {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy())
}

/// Process one cycle's stale candidates.
///
/// Real run: remove each candidate and log it; the first removal failure
/// aborts the pass and earlier removals stand. Dry run: log each candidate
/// without touching the filesystem. The continuation fires exactly once in
/// either mode, success or failure; the error travels back through the
/// returned `Result` independently.
pub fn apply(
    candidates: &[PathBuf],
    settings: &Settings,
    done: Continuation,
) -> Result<Vec<CleanupOutcome>, TidyError> {
    let result = remove_candidates(candidates, settings);
    done();
    result
}

fn remove_candidates(
    candidates: &[PathBuf],
    settings: &Settings,
) -> Result<Vec<CleanupOutcome>, TidyError> {
    let mut outcomes = Vec::with_capacity(candidates.len());

    for path in candidates {
        if settings.dry_run {
            println!("{} {}", dry_delete_marker(), basename(path));
            outcomes.push(CleanupOutcome::Reported(path.clone()));
        } else {
            fs::remove_file(path).map_err(|source| TidyError::Remove {
                path: path.clone(),
                source,
            })?;
            println!("{} {}", deleted_marker(), basename(path));
            outcomes.push(CleanupOutcome::Deleted(path.clone()));
        }
    }

    Ok(outcomes)
}

/// Matcher plus executor for one completed build cycle: discover stale
/// siblings of the cycle's outputs and clean them up. The continuation
/// fires exactly once even when discovery itself fails.
pub fn run_cycle_pass(
    chunks: &[ChunkOutput],
    settings: &Settings,
    done: Continuation,
) -> Result<Vec<CleanupOutcome>, TidyError> {
    match find_stale(chunks, settings) {
        Ok(candidates) => apply(&candidates, settings, done),
        Err(err) => {
            done();
            Err(err)
        }
    }
}

/// Empty the output directory before the first build of a session.
///
/// A missing output directory is a pass-through: nothing to do, the
/// continuation (when supplied) still fires. When the directory exists,
/// the continuation is required up front since the completion contract
/// could not otherwise be honored. Real run removes the directory's
/// contents (the directory itself persists); dry run enumerates every
/// file underneath at unbounded depth and logs it instead.
pub fn wipe_output_dir(
    settings: &Settings,
    done: Option<Continuation>,
) -> Result<(), TidyError> {
    let root = settings.output_path();

    if !root.exists() {
        if let Some(done) = done {
            done();
        }
        return Ok(());
    }

    let done = done.ok_or(TidyError::MissingContinuation)?;

    let result = if settings.dry_run {
        enumerate_contents(root)
    } else {
        empty_dir(root)
    };
    done();
    result
}

fn empty_dir(root: &Path) -> Result<(), TidyError> {
    println!("{} output dir", clean_marker());

    let entries = fs::read_dir(root).map_err(|source| TidyError::Enumerate {
        path: root.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| TidyError::Enumerate {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        let removal = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removal.map_err(|source| TidyError::Remove { path, source })?;
    }

    Ok(())
}

fn enumerate_contents(root: &Path) -> Result<(), TidyError> {
    println!("{} output dir", dry_clean_marker());

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| TidyError::Enumerate {
            path: root.to_path_buf(),
            source: io::Error::from(source),
        })?;
        if entry.file_type().is_file() {
            println!("- {} {}", dry_delete_marker(), entry.path().display());
        }
    }

    Ok(())
}
