// In: src/host.rs

//! Contracts for the host application's side of the workflow.
//!
//! The host owns the image buffers, their undo histories, and the execution
//! context the workflow was triggered from. The library only ever borrows a
//! buffer for the duration of one run; it never copies pixel data.

/// The context a workflow invocation is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// A global invocation with no specific buffer instance. The workflow
    /// refuses to run here.
    Global,
    /// Bound to one specific image buffer instance.
    Buffer,
}

/// One live image buffer plus its host-maintained undo history.
///
/// Rollback is modeled as checkpoint/restore rather than raw undo counting:
/// the orchestrator calls [`checkpoint`](TargetBuffer::checkpoint) before a
/// branch whose pixel mutations it intends to revert, then
/// [`restore_last_n`](TargetBuffer::restore_last_n) with the number of
/// mutations performed since. Restoring reverts pixel state only; derived
/// artifacts created along the way (such as an extracted star mask) are
/// owned by the host and survive the restore.
pub trait TargetBuffer {
    /// The host's identifier for this buffer.
    fn id(&self) -> &str;

    /// Mark the current undo depth as a rollback anchor.
    fn checkpoint(&mut self);

    /// Revert the last `n` pixel mutations since the matching checkpoint.
    ///
    /// Infallible by contract: the orchestrator only restores mutations it
    /// performed itself after its own checkpoint, so the history is always
    /// deep enough.
    fn restore_last_n(&mut self, n: usize);
}

/// The host facility that resolves opaque buffer references.
pub trait BufferHost {
    /// The context this invocation runs in.
    fn context(&self) -> ExecutionContext;

    /// Resolve a stored buffer reference to a live buffer, or `None` when
    /// the buffer has been closed or never existed.
    fn resolve_buffer(&mut self, reference: &str) -> Option<&mut dyn TargetBuffer>;
}
