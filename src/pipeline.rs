//! Glue between the cleanup passes and the host pipeline's lifecycle.

use crate::cleaner::{run_cycle_pass, wipe_output_dir, Continuation};
use crate::config::{Options, Settings};
use crate::error::TidyError;
use crate::patterns::ChunkOutput;

/// Hook invoked after each completed build cycle, including incremental
/// rebuilds during a watch session.
pub type CycleHook = Box<dyn FnMut(&[ChunkOutput], Continuation) -> Result<(), TidyError>>;

/// Hook invoked once per process lifetime, before the first cycle begins.
pub type SessionHook = Box<dyn FnOnce(Option<Continuation>) -> Result<(), TidyError>>;

/// The host pipeline's event registration surface. The pipeline itself is
/// an opaque collaborator; it exposes exactly these two lifecycle events.
pub trait PipelineHooks {
    fn after_cycle(&mut self, hook: CycleHook);
    fn before_first_cycle(&mut self, hook: SessionHook);
}

/// The slice of the pipeline's configuration the plugin consumes.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_path: String,
    pub watch: bool,
}

/// Keeps the output directory tidy over the lifetime of a build session.
///
/// Construct with partial [`Options`], then [`install`](TidyPlugin::install)
/// against the pipeline once its configuration is complete.
pub struct TidyPlugin {
    opts: Options,
}

impl TidyPlugin {
    pub fn new(opts: Options) -> Self {
        TidyPlugin { opts }
    }

    /// Resolve settings against the pipeline's output path and register
    /// the matching lifecycle hook.
    ///
    /// Watch sessions get the per-cycle stale-artifact pass; one-off
    /// builds get the session-start wipe. The two modes are mutually
    /// exclusive per configuration. Configuration errors abort the
    /// installation before any hook is registered. Returns the resolved
    /// settings so the host can observe the normalized output path.
    pub fn install<H: PipelineHooks>(
        &self,
        hooks: &mut H,
        pipeline: &PipelineConfig,
    ) -> Result<Settings, TidyError> {
        let settings = Settings::resolve(&self.opts, &pipeline.output_path)?;

        if pipeline.watch {
            let cycle_settings = settings.clone();
            hooks.after_cycle(Box::new(move |chunks, done| {
                run_cycle_pass(chunks, &cycle_settings, done).map(|_| ())
            }));
        } else {
            let wipe_settings = settings.clone();
            hooks.before_first_cycle(Box::new(move |done| {
                wipe_output_dir(&wipe_settings, done)
            }));
        }

        Ok(settings)
    }
}
