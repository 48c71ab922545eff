//! Stale artifact discovery: hash-derived patterns and glob matching.

use crate::config::Settings;
use crate::error::TidyError;
use glob::MatchOptions;
use std::collections::HashSet;
use std::path::PathBuf;

/// Extension of the sidecar file a produced artifact may carry alongside
/// it (a source map shares the artifact's hashed name plus this suffix).
pub const SIDECAR_SUFFIX: &str = ".map";

/// One logical chunk of a completed build cycle, as reported by the host
/// pipeline: the cycle's content hash, whether the chunk's files were
/// actually (re)written this cycle, and the file names produced for it
/// (relative to the output path, sidecars listed as their own entries).
#[derive(Debug, Clone)]
pub struct ChunkOutput {
    pub hash: String,
    pub emitted: bool,
    pub files: Vec<String>,
}

/// Find prior-cycle siblings of the files produced in this cycle.
///
/// For each emitted file, the leading `hash_length` characters of the
/// chunk hash are replaced with a wildcard to derive a name pattern
/// (`app.ab12e.js` -> `app.*.js`), which is globbed under the output path
/// together with its `.map` sidecar variant. Exact matches to any
/// current-cycle output (or its sidecar) are excluded; the survivors are
/// the stale candidates. Candidates are deduplicated across patterns and
/// returned in discovery order.
pub fn find_stale(chunks: &[ChunkOutput], settings: &Settings) -> Result<Vec<PathBuf>, TidyError> {
    // Every file of every chunk is a current output, whether or not it was
    // rewritten this cycle, and so is its sidecar.
    let current: HashSet<PathBuf> = chunks
        .iter()
        .flat_map(|chunk| chunk.files.iter())
        .flat_map(|name| {
            let rooted = settings.rooted(name);
            let sidecar = PathBuf::from(format!("{}{}", rooted.display(), SIDECAR_SUFFIX));
            [rooted, sidecar]
        })
        .collect();

    // The wildcard stands in for a hash, which never spans a separator.
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        ..MatchOptions::default()
    };

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut candidates = Vec::new();

    for chunk in chunks.iter().filter(|chunk| chunk.emitted) {
        let prefix = hash_prefix(&chunk.hash, settings.hash_length);
        if prefix.is_empty() {
            continue;
        }

        for name in &chunk.files {
            let Some(pattern) = derive_pattern(name, prefix) else {
                continue;
            };

            for variant in [pattern.clone(), format!("{pattern}{SIDECAR_SUFFIX}")] {
                let rooted = format!("{}{}", settings.glob_root(), variant);
                let paths =
                    glob::glob_with(&rooted, options).map_err(|source| TidyError::Pattern {
                        pattern: rooted.clone(),
                        source,
                    })?;

                for entry in paths {
                    let path = entry?;
                    if current.contains(&path) || !seen.insert(path.clone()) {
                        continue;
                    }
                    candidates.push(path);
                }
            }
        }
    }

    Ok(candidates)
}

/// The leading `hash_length` characters of a chunk hash (the whole hash
/// when it is shorter than that).
fn hash_prefix(hash: &str, hash_length: usize) -> &str {
    &hash[..hash_length.min(hash.len())]
}

/// Derive the glob pattern matching same-named files of any hash.
///
/// The file name is glob-escaped and the first occurrence of the hash
/// prefix is replaced with `*`, consistent with how the pipeline embeds
/// the hash. A name that does not contain the prefix yields no pattern.
fn derive_pattern(name: &str, hash_prefix: &str) -> Option<String> {
    let escaped_name = glob::Pattern::escape(name);
    let escaped_hash = glob::Pattern::escape(hash_prefix);
    let start = escaped_name.find(&escaped_hash)?;

    Some(format!(
        "{}*{}",
        &escaped_name[..start],
        &escaped_name[start + escaped_hash.len()..]
    ))
}
