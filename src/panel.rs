//! Floating panel lifecycle: open/closed state and the authoritative
//! load token used to discard stale image loads.

use tracing::{debug, trace};

use crate::geometry::{AnchorBox, ScaledSize};

/// Fixed offset of the panel from the anchor's trailing edge, right and
/// below, in display units.
pub const ANCHOR_OFFSET: i32 = 30;

/// Panel lifecycle state. Exactly one panel exists per host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Opening,
    Loading,
    Shown,
}

/// Identity of the image load currently authorized to touch the panel.
///
/// Two tokens are equal when their generations are equal; the source string
/// is carried for rendering and logging. A per-open generation avoids the
/// collision where two different hover targets momentarily resolve to the
/// same URL.
#[derive(Debug, Clone)]
pub struct LoadToken {
    generation: u64,
    source: String,
}

impl LoadToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
impl LoadToken {
    pub(crate) fn for_tests(generation: u64, source: &str) -> Self {
        Self {
            generation,
            source: source.to_owned(),
        }
    }
}

impl PartialEq for LoadToken {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation
    }
}

impl Eq for LoadToken {}

/// The host's actual panel widget. All visibility and content mutation
/// funnels through this trait.
pub trait PanelView {
    /// Opens the popup anchored to the element, offset right/below its
    /// trailing edge.
    fn open_at(&mut self, anchor: &AnchorBox, offset: i32);

    /// Hides the popup. Called at most once per open.
    fn hide(&mut self);

    /// Clears any previously rendered image and sizing.
    fn clear_content(&mut self);

    /// Displays the image at the given size.
    fn show_image(&mut self, source: &str, size: ScaledSize);
}

/// Owns [`PanelState`] and the current [`LoadToken`].
///
/// Invariants held at every public-method boundary: `Loading`/`Shown` imply
/// a token is present, `Closed` implies none.
pub struct PanelLifecycle<V: PanelView> {
    view: V,
    state: PanelState,
    token: Option<LoadToken>,
    next_generation: u64,
}

impl<V: PanelView> PanelLifecycle<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            state: PanelState::Closed,
            token: None,
            next_generation: 0,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Begins showing `source` anchored to `anchor` and returns the token
    /// that authorizes the eventual render.
    ///
    /// Idempotent on an already-open panel: content is reset and the token
    /// replaced, but the popup is not reopened.
    pub fn open(&mut self, anchor: &AnchorBox, source: impl Into<String>) -> LoadToken {
        let source = source.into();
        debug!(%source, state = ?self.state, "panel open");

        self.view.clear_content();
        if self.state == PanelState::Closed {
            self.state = PanelState::Opening;
            self.view.open_at(anchor, ANCHOR_OFFSET);
        }

        self.next_generation += 1;
        let token = LoadToken {
            generation: self.next_generation,
            source,
        };
        self.token = Some(token.clone());
        self.state = PanelState::Loading;
        token
    }

    /// Closes the panel and invalidates the current token, which is the
    /// sole cancellation mechanism for in-flight loads. Safe from any
    /// state; a no-op when already closed.
    pub fn close(&mut self) {
        self.token = None;
        if self.state != PanelState::Closed {
            trace!(state = ?self.state, "panel close");
            self.view.hide();
            self.state = PanelState::Closed;
        }
    }

    /// Whether `token` is still the authoritative load.
    pub fn is_current(&self, token: &LoadToken) -> bool {
        self.token.as_ref() == Some(token)
    }

    /// Renders the loaded image if `token` is still current. Returns
    /// whether anything was displayed; a stale token is silently dropped.
    pub fn render(&mut self, token: &LoadToken, size: ScaledSize) -> bool {
        if !self.is_current(token) {
            trace!(source = token.source(), "stale render dropped");
            return false;
        }
        debug!(source = token.source(), ?size, "panel render");
        self.view.show_image(token.source(), size);
        self.state = PanelState::Shown;
        true
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}
