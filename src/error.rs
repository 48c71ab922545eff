//! Error types surfaced by cleanup passes.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a cleanup pass or plugin installation.
///
/// Configuration problems (`MissingOutputPath`, `RootOutputPath`) abort
/// installation; `MissingContinuation` is a host programming error; the
/// remaining variants are fatal to the current build cycle and are never
/// retried.
#[derive(Debug, Error)]
pub enum TidyError {
    #[error("no output path configured for the build pipeline")]
    MissingOutputPath,

    #[error("refusing to operate on the filesystem root")]
    RootOutputPath,

    #[error("no continuation provided for async completion")]
    MissingContinuation,

    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("glob walk failed: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to enumerate {path}: {source}")]
    Enumerate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
