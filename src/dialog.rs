// In: src/dialog.rs

//! The parameter-entry dialog contract.
//!
//! Rendering belongs to the host; the library only defines the exchange: the
//! dialog receives a copy of the current config (bound to the numeric field
//! metadata in [`crate::config::NUMERIC_FIELDS`] plus a buffer selector) and
//! either returns an edited config on accept or nothing on cancel.

use crate::config::StarflowConfig;

/// Modal parameter editing. Blocks the caller until the user decides.
pub trait ConfigDialog {
    /// Present `initial` for editing. `Some(edited)` on accept, `None` on
    /// cancel. Cancelling skips the entire pipeline with no side effects.
    fn edit(&mut self, initial: StarflowConfig) -> Option<StarflowConfig>;
}
