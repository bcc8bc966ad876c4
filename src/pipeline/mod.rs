// In: src/pipeline/mod.rs

//! The fixed star-removal pipeline: request contracts for the two external
//! AI transforms, and the orchestrator that sequences them.

pub mod orchestrator;
pub mod request;

pub use orchestrator::{PipelineOrchestrator, PipelineStage};
pub use request::{
    SeparationRequest, SharpenRequest, TransformExecutor, TransformRequest,
};
