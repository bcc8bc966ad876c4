//! This file is the root of the `starflow` Rust crate.
//!
//! starflow automates a fixed, order-sensitive star-removal workflow inside a
//! host image-processing application: it chains an AI deconvolution/sharpening
//! transform and an AI star-separation transform in the sequence that avoids
//! the "worms" artifact star removal otherwise leaves behind.
//!
//! The crate owns the model-path resolution and the pipeline orchestration;
//! the host supplies the image buffers, the parameter dialog, and the two
//! transform executors through the traits in [`host`], [`dialog`], and
//! [`pipeline`].

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod config;
pub mod dialog;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod resolver;
pub mod store;
pub mod workflow;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use config::{Overlap, StarflowConfig};
pub use dialog::ConfigDialog;
pub use error::{ExecutorError, StarflowError};
pub use host::{BufferHost, ExecutionContext, TargetBuffer};
pub use pipeline::{PipelineOrchestrator, PipelineStage, TransformExecutor, TransformRequest};
pub use resolver::{resolve_model, ResolvedModelPath};
pub use store::{JsonFileStore, MemoryStore, ParameterStore};
pub use workflow::{run, WorkflowModels, WorkflowOutcome};

/// Turn on debug-level logging to stderr. Intended for host scripting
/// consoles and test runs; safe to call more than once.
pub fn enable_verbose_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}
