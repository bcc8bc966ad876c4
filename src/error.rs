// In: src/error.rs

//! This module defines the single, unified error type for the entire starflow
//! library. It uses the `thiserror` crate to provide ergonomic, context-aware
//! error handling.

use std::path::PathBuf;

use thiserror::Error;

/// An error reported by an external transform executor.
///
/// Executors are host-provided collaborators; their failure reason is an
/// opaque message from the orchestrator's point of view. The orchestrator
/// wraps it in [`StarflowError::StageFailed`] together with the name of the
/// pipeline stage that invoked the executor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ExecutorError(pub String);

impl ExecutorError {
    pub fn new(message: impl Into<String>) -> Self {
        ExecutorError(message.into())
    }
}

#[derive(Error, Debug)]
pub enum StarflowError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// No candidate model file existed on disk. Carries every path that was
    /// checked, in the exact order it was checked, for diagnostics.
    #[error("could not find an AI model file; checked:\n{}", format_checked(.checked))]
    ModelNotFound { checked: Vec<PathBuf> },

    /// The target buffer reference did not resolve to a live image buffer.
    #[error("no active image; open an image and select it before running")]
    NoActiveImage,

    /// Invoked in a global execution context instead of bound to one buffer.
    #[error("cannot run in a global context; bind the workflow to a specific image buffer")]
    InvalidContext,

    /// A specific executor call returned failure. Terminal for the run.
    #[error("pipeline stage '{stage}' failed: {source}")]
    StageFailed {
        stage: &'static str,
        #[source]
        source: ExecutorError,
    },

    /// A configuration field was outside its documented range.
    #[error("parameter '{field}' out of range: {value} is not within [{min}, {max}]")]
    InvalidParameter {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while reading or
    /// writing the persisted parameter file.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

fn format_checked(checked: &[PathBuf]) -> String {
    checked
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_not_found_lists_every_checked_path() {
        let err = StarflowError::ModelNotFound {
            checked: vec![PathBuf::from("/a/m.pb"), PathBuf::from("/b/m.pb")],
        };
        let text = err.to_string();
        assert!(text.contains("/a/m.pb"));
        assert!(text.contains("/b/m.pb"));
    }

    #[test]
    fn stage_failed_names_the_stage_and_chains_the_source() {
        let err = StarflowError::StageFailed {
            stage: "starless",
            source: ExecutorError::new("inference aborted"),
        };
        assert_eq!(
            err.to_string(),
            "pipeline stage 'starless' failed: inference aborted"
        );
    }
}
