// In: src/pipeline/request.rs

//! Parameter contracts for the two external AI transforms.
//!
//! Each pipeline stage configures one fully-specified request and hands it to
//! an injected [`TransformExecutor`]. The request structs carry every knob
//! the external transforms expose, including the ones this workflow always
//! pins to a fixed value, so a host-side executor can map a request onto its
//! process object field-for-field.

use crate::config::{Overlap, StarflowConfig};
use crate::error::ExecutorError;
use crate::host::TargetBuffer;
use crate::resolver::ResolvedModelPath;

//==================================================================================
// I. Stellar Sharpening / Correction Requests
//==================================================================================

/// One invocation of the deconvolution/sharpening transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SharpenRequest {
    pub model: ResolvedModelPath,
    pub sharpen_stars: f64,
    pub sharpen_nonstellar: f64,
    pub adjust_halos: f64,
    /// Apply only the optical correction, no sharpening.
    pub correct_only: bool,
    // Pinned by this workflow; exposed so executors can set them explicitly.
    pub nonstellar_psf_diameter: f64,
    pub auto_nonstellar_psf: bool,
    pub luminance_only: bool,
}

impl SharpenRequest {
    fn base(model: &ResolvedModelPath) -> Self {
        Self {
            model: model.clone(),
            sharpen_stars: 0.0,
            sharpen_nonstellar: 0.0,
            adjust_halos: 0.0,
            correct_only: false,
            nonstellar_psf_diameter: 0.0,
            auto_nonstellar_psf: true,
            luminance_only: false,
        }
    }

    /// Correction-only pass: every sharpening strength zeroed.
    pub fn correction(model: &ResolvedModelPath) -> Self {
        Self {
            correct_only: true,
            ..Self::base(model)
        }
    }

    /// Star sharpening pass feeding the mask branch.
    pub fn stars(model: &ResolvedModelPath, config: &StarflowConfig) -> Self {
        Self {
            sharpen_stars: config.sharpen_stars,
            adjust_halos: config.adjust_halos,
            ..Self::base(model)
        }
    }

    /// Final nonstellar sharpening pass over the starless image.
    pub fn nonstellar(model: &ResolvedModelPath, config: &StarflowConfig) -> Self {
        Self {
            sharpen_nonstellar: config.sharpen_nonstellar,
            ..Self::base(model)
        }
    }
}

//==================================================================================
// II. Star Separation Requests
//==================================================================================

/// One invocation of the star-separation transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparationRequest {
    pub model: ResolvedModelPath,
    /// `true` isolates the stars (producing the mask artifact); `false`
    /// removes them, leaving the starless image.
    pub stars: bool,
    pub overlap: Overlap,
    /// Pinned off by this workflow.
    pub unscreen: bool,
}

impl SeparationRequest {
    /// Star/mask extraction pass.
    pub fn star_mask(model: &ResolvedModelPath, overlap: Overlap) -> Self {
        Self {
            model: model.clone(),
            stars: true,
            overlap,
            unscreen: false,
        }
    }

    /// Starless pass.
    pub fn starless(model: &ResolvedModelPath, overlap: Overlap) -> Self {
        Self {
            model: model.clone(),
            stars: false,
            overlap,
            unscreen: false,
        }
    }
}

//==================================================================================
// III. The Executor Capability
//==================================================================================

/// A fully-specified call to one of the two transforms.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformRequest {
    Sharpen(SharpenRequest),
    Separate(SeparationRequest),
}

/// The external transform capability.
///
/// Two configured instances are injected into the orchestrator: one backing
/// the sharpening transform, one backing star separation. An executor
/// mutates the buffer's pixel state (recorded in the host's undo history)
/// and may additionally create derived artifacts the host owns. Execution
/// blocks until the transform completes; there is no timeout and no
/// cancellation once a call has started.
pub trait TransformExecutor {
    fn execute(
        &mut self,
        buffer: &mut dyn TargetBuffer,
        request: &TransformRequest,
    ) -> Result<(), ExecutorError>;
}
