// In: src/workflow.rs

//! The workflow entry point.
//!
//! This is the thin stateful layer over the pure orchestrator: it loads the
//! persisted parameters, shows the dialog, persists the accepted edits,
//! checks the invocation preconditions, resolves the two model files, and
//! hands everything to [`PipelineOrchestrator`]. Declining the dialog skips
//! the pipeline entirely, with no side effects.

use crate::config::StarflowConfig;
use crate::dialog::ConfigDialog;
use crate::error::StarflowError;
use crate::host::{BufferHost, ExecutionContext};
use crate::pipeline::orchestrator::PipelineOrchestrator;
use crate::pipeline::request::TransformExecutor;
use crate::resolver::{self, ResolvedModelPath};
use crate::store::ParameterStore;

/// How a triggered workflow run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Every enabled stage ran to completion.
    Completed,
    /// The user declined the dialog; nothing was executed or persisted.
    Cancelled,
}

/// The two resolved model files a run needs.
#[derive(Debug, Clone)]
pub struct WorkflowModels {
    pub sharpen: ResolvedModelPath,
    pub separation: ResolvedModelPath,
}

impl WorkflowModels {
    /// Resolve both models from the standard install locations.
    pub fn resolve_default() -> Result<Self, StarflowError> {
        Ok(Self {
            sharpen: resolver::resolve_sharpen_model()?,
            separation: resolver::resolve_separation_model()?,
        })
    }
}

/// Run the whole workflow: load parameters, edit, execute.
///
/// This is the single trigger the host binds to a menu action. Model files
/// are resolved from the standard install locations; hosts with custom model
/// layouts use [`run_with`].
pub fn run(
    host: &mut dyn BufferHost,
    store: &mut dyn ParameterStore,
    dialog: &mut dyn ConfigDialog,
    sharpen: &mut dyn TransformExecutor,
    separation: &mut dyn TransformExecutor,
) -> Result<WorkflowOutcome, StarflowError> {
    run_with(
        host,
        store,
        dialog,
        sharpen,
        separation,
        WorkflowModels::resolve_default,
    )
}

/// [`run`] with an injectable model locator.
///
/// `locate_models` is called once, after the dialog is accepted and before
/// any stage executes; its failure aborts the run before the first executor
/// call.
pub fn run_with<F>(
    host: &mut dyn BufferHost,
    store: &mut dyn ParameterStore,
    dialog: &mut dyn ConfigDialog,
    sharpen: &mut dyn TransformExecutor,
    separation: &mut dyn TransformExecutor,
    locate_models: F,
) -> Result<WorkflowOutcome, StarflowError>
where
    F: FnOnce() -> Result<WorkflowModels, StarflowError>,
{
    // 1. Defaults, overlaid with whatever the store remembers. A remembered
    //    buffer that no longer exists degrades to "no buffer selected" so the
    //    dialog opens with an empty selector instead of failing the load.
    let mut initial = StarflowConfig::load_from(store);
    if let Some(reference) = initial.target_buffer.as_deref() {
        if host.resolve_buffer(reference).is_none() {
            log::debug!("persisted buffer reference '{reference}' is no longer live");
            initial.target_buffer = None;
        }
    }

    // 2. Modal edit. Cancel means a clean no-op.
    let config = match dialog.edit(initial) {
        Some(edited) => edited,
        None => {
            log::info!("dialog cancelled; skipping pipeline");
            return Ok(WorkflowOutcome::Cancelled);
        }
    };

    // 3. The accepted config must be in range, and is remembered for the
    //    next invocation before the run starts.
    config.validate()?;
    config.save_to(store);

    // 4. Invocation preconditions.
    if host.context() == ExecutionContext::Global {
        return Err(StarflowError::InvalidContext);
    }
    let reference = config
        .target_buffer
        .as_deref()
        .ok_or(StarflowError::NoActiveImage)?;
    let buffer = host
        .resolve_buffer(reference)
        .ok_or(StarflowError::NoActiveImage)?;

    // 5. Both models must exist before any stage runs.
    let models = locate_models()?;
    log::info!(
        "using sharpening model '{}' and separation model '{}'",
        models.sharpen,
        models.separation
    );

    // 6. Execute.
    let orchestrator = PipelineOrchestrator::new(&config, &models.sharpen, &models.separation);
    orchestrator.run(buffer, sharpen, separation)?;

    Ok(WorkflowOutcome::Completed)
}
