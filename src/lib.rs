//! BuildTidy - Hashed Build Output Janitor
//!
//! BuildTidy keeps a build pipeline's output directory clean across a session.
//! During watch sessions it runs after every completed build cycle, finds files
//! that share a logical name with a freshly produced artifact but carry a stale
//! content-hash in their filename (`app.1234.js` next to a fresh `app.ab12e.js`),
//! and removes them along with their source-map sidecars. For one-off builds it
//! instead wipes the output directory's contents before the first cycle.
//!
//! In dry-run mode both passes log what would be removed without touching the
//! filesystem.
//!
//! ## Architecture
//!
//! - `config`: option merging and output path validation/normalization
//! - `patterns`: hash-derived glob patterns and stale candidate discovery
//! - `cleaner`: deletion passes, dry-run reporting, completion contract
//! - `pipeline`: registration against the host pipeline's lifecycle events

pub mod cleaner;
pub mod config;
pub mod error;
pub mod patterns;
pub mod pipeline;

// Re-export commonly used items
pub use cleaner::{apply, run_cycle_pass, wipe_output_dir, CleanupOutcome, Continuation};
pub use config::{Options, Settings};
pub use error::TidyError;
pub use patterns::{find_stale, ChunkOutput, SIDECAR_SUFFIX};
pub use pipeline::{CycleHook, PipelineConfig, PipelineHooks, SessionHook, TidyPlugin};
