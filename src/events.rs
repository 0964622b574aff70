//! Deferred completions delivered back to the controller's event loop.

use crate::geometry::{AnchorBox, Viewport};
use crate::panel::LoadToken;

/// Outcome of one preload job. Exactly one is produced per submitted job.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded { width: u32, height: u32 },
    Failed { error: String },
}

/// Events the controller consumes on `pump`. All panel state transitions
/// happen while handling these, which keeps the whole controller a single
/// logical thread of interleaved callbacks.
#[derive(Debug)]
pub enum ControllerEvent {
    /// The debounce timer for `request` elapsed. Honored only if `request`
    /// is still the armed one.
    DebounceFired { request: u64 },
    /// A preload job finished. Honored only if `token` is still current.
    LoadFinished {
        token: LoadToken,
        anchor: AnchorBox,
        viewport: Viewport,
        outcome: LoadOutcome,
    },
}
