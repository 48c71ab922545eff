//! Option resolution and output path validation.

use crate::error::TidyError;
use serde::Deserialize;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Construction-time options, as supplied by the host's configuration.
///
/// Unknown keys are accepted and ignored so older configs keep working
/// when the host grows new settings. Key names are camelCase on the wire
/// (`dryRun`, `hashLength`), matching the pipeline's option records.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Log what would be removed instead of removing it.
    pub dry_run: bool,
    /// How many leading characters of a chunk hash appear in file names.
    pub hash_length: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            dry_run: false,
            hash_length: 5,
        }
    }
}

/// Fully resolved settings, created once per plugin installation.
///
/// The output path is only known once the host pipeline's configuration is
/// complete, so resolution happens at install time rather than construction
/// time. Immutable afterwards; hook closures own a clone.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dry_run: bool,
    pub hash_length: usize,
    output_path: PathBuf,
}

impl Settings {
    /// Merge options with the pipeline's output path, validating and
    /// normalizing the path.
    pub fn resolve(opts: &Options, output_path: &str) -> Result<Self, TidyError> {
        if output_path.is_empty() {
            return Err(TidyError::MissingOutputPath);
        }
        // A path with no parent component is the filesystem root ("/" on
        // Unix, a bare drive root on Windows).
        if Path::new(output_path).parent().is_none() {
            return Err(TidyError::RootOutputPath);
        }

        let mut normalized = output_path.to_string();
        if !normalized.ends_with(MAIN_SEPARATOR) {
            normalized.push(MAIN_SEPARATOR);
        }

        Ok(Settings {
            dry_run: opts.dry_run,
            hash_length: opts.hash_length,
            output_path: PathBuf::from(normalized),
        })
    }

    /// The normalized output directory (always ends with a separator).
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Output-rooted path for a file name produced by the pipeline.
    pub fn rooted(&self, name: &str) -> PathBuf {
        self.output_path.join(name)
    }

    /// Output path as a glob pattern prefix, with glob metacharacters in
    /// the directory name escaped so they match literally.
    pub(crate) fn glob_root(&self) -> String {
        glob::Pattern::escape(&self.output_path.to_string_lossy())
    }
}
