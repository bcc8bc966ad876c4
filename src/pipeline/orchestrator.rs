// In: src/pipeline/orchestrator.rs

//! The pipeline orchestrator.
//!
//! Runs the fixed stage sequence
//! `correction? -> [stars, mask, restore x2]? -> starless -> nonstellar?`
//! against one target buffer. The ordering is the whole point of the
//! workflow: sharpening stars before separating them is what keeps the
//! "worms" artifact out of the starless image, and the mask branch's pixel
//! mutations are rolled back so the starless pass always starts from the
//! corrected original.
//!
//! Stages run synchronously and strictly in order. No stage is retried, and
//! the first failure terminates the run. The only built-in compensation is
//! the checkpoint/restore pair around the mask branch, which runs on that
//! branch's success path — never as error recovery.

use crate::config::StarflowConfig;
use crate::error::{ExecutorError, StarflowError};
use crate::host::TargetBuffer;
use crate::pipeline::request::{
    SeparationRequest, SharpenRequest, TransformExecutor, TransformRequest,
};
use crate::resolver::ResolvedModelPath;

//==================================================================================
// I. Stage Definitions
//==================================================================================

/// The conceptual stages of one run, in execution order.
///
/// Stages are read-only definitions: a name for diagnostics and an enablement
/// predicate over the config. They own no mutable state beyond the shared
/// target buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Optical correction only, gated by `config.correct`.
    Correction,
    /// Star sharpening feeding the mask branch, gated by
    /// `config.generate_star_mask`.
    Stars,
    /// Star/mask extraction, gated by `config.generate_star_mask`.
    Mask,
    /// Starless generation. Always runs.
    Starless,
    /// Final nonstellar sharpening, gated by a non-zero
    /// `config.sharpen_nonstellar`.
    Nonstellar,
}

impl PipelineStage {
    pub const SEQUENCE: [PipelineStage; 5] = [
        PipelineStage::Correction,
        PipelineStage::Stars,
        PipelineStage::Mask,
        PipelineStage::Starless,
        PipelineStage::Nonstellar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PipelineStage::Correction => "correction",
            PipelineStage::Stars => "stars",
            PipelineStage::Mask => "mask",
            PipelineStage::Starless => "starless",
            PipelineStage::Nonstellar => "nonstellar",
        }
    }

    pub fn is_enabled(self, config: &StarflowConfig) -> bool {
        match self {
            PipelineStage::Correction => config.correct,
            PipelineStage::Stars | PipelineStage::Mask => config.generate_star_mask,
            PipelineStage::Starless => true,
            PipelineStage::Nonstellar => config.sharpen_nonstellar != 0.0,
        }
    }
}

//==================================================================================
// II. The Orchestrator
//==================================================================================

/// Executes the fixed stage sequence for one run.
///
/// Both model paths must already be resolved before construction; the
/// orchestrator performs no filesystem access of its own. The config is
/// borrowed immutably for the whole run.
pub struct PipelineOrchestrator<'a> {
    config: &'a StarflowConfig,
    sharpen_model: &'a ResolvedModelPath,
    separation_model: &'a ResolvedModelPath,
}

impl<'a> PipelineOrchestrator<'a> {
    pub fn new(
        config: &'a StarflowConfig,
        sharpen_model: &'a ResolvedModelPath,
        separation_model: &'a ResolvedModelPath,
    ) -> Self {
        Self {
            config,
            sharpen_model,
            separation_model,
        }
    }

    /// Run every enabled stage against `buffer`, in order.
    ///
    /// `sharpen` backs the deconvolution/sharpening transform, `separation`
    /// the star-separation transform. The first executor failure is wrapped
    /// in [`StarflowError::StageFailed`] and terminates the run.
    pub fn run(
        &self,
        buffer: &mut dyn TargetBuffer,
        sharpen: &mut dyn TransformExecutor,
        separation: &mut dyn TransformExecutor,
    ) -> Result<(), StarflowError> {
        let config = self.config;

        // 1. Optional correction-only pass over the untouched image.
        if PipelineStage::Correction.is_enabled(config) {
            self.execute(
                PipelineStage::Correction,
                buffer,
                sharpen,
                TransformRequest::Sharpen(SharpenRequest::correction(self.sharpen_model)),
            )?;
        }

        // 2. Optional mask branch: sharpen the stars, extract them as a
        //    mask, then restore the pixel state from before the branch. The
        //    extracted mask is a host-owned artifact and survives the
        //    restore; only the two pixel mutations are reverted.
        if PipelineStage::Stars.is_enabled(config) {
            buffer.checkpoint();

            self.execute(
                PipelineStage::Stars,
                buffer,
                sharpen,
                TransformRequest::Sharpen(SharpenRequest::stars(self.sharpen_model, config)),
            )?;
            self.execute(
                PipelineStage::Mask,
                buffer,
                separation,
                TransformRequest::Separate(SeparationRequest::star_mask(
                    self.separation_model,
                    config.overlap,
                )),
            )?;

            log::info!("mask branch complete; restoring pre-branch pixel state");
            buffer.restore_last_n(2);
        }

        // 3. Starless generation. Unconditional.
        self.execute(
            PipelineStage::Starless,
            buffer,
            separation,
            TransformRequest::Separate(SeparationRequest::starless(
                self.separation_model,
                config.overlap,
            )),
        )?;

        // 4. Optional nonstellar sharpening of the starless result.
        if PipelineStage::Nonstellar.is_enabled(config) {
            self.execute(
                PipelineStage::Nonstellar,
                buffer,
                sharpen,
                TransformRequest::Sharpen(SharpenRequest::nonstellar(self.sharpen_model, config)),
            )?;
        }

        log::info!("processing complete");
        Ok(())
    }

    fn execute(
        &self,
        stage: PipelineStage,
        buffer: &mut dyn TargetBuffer,
        executor: &mut dyn TransformExecutor,
        request: TransformRequest,
    ) -> Result<(), StarflowError> {
        log::info!("starting stage '{}' on buffer '{}'", stage.name(), buffer.id());
        executor
            .execute(buffer, &request)
            .map_err(|source: ExecutorError| StarflowError::StageFailed {
                stage: stage.name(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StarflowConfig;

    #[test]
    fn stage_gating_follows_config_flags() {
        let mut config = StarflowConfig::default();
        config.correct = false;
        config.generate_star_mask = false;
        config.sharpen_nonstellar = 0.0;

        let enabled: Vec<_> = PipelineStage::SEQUENCE
            .iter()
            .filter(|s| s.is_enabled(&config))
            .collect();
        assert_eq!(enabled, vec![&PipelineStage::Starless]);
    }

    #[test]
    fn starless_is_always_enabled() {
        let config = StarflowConfig::default();
        assert!(PipelineStage::Starless.is_enabled(&config));
    }
}
