//! Root hover-to-preview controller.
//!
//! The host delivers page-load, tab-switch, and pointer-over events and
//! drains the controller's event channel from its main loop (`pump` /
//! `pump_until_idle`). Every panel transition happens on the pumping
//! thread, so the whole controller behaves as one logical thread of
//! interleaved callbacks; the debounce sleeper and the preload worker only
//! ever post events.

use std::sync::Arc;
use std::time::{Duration, Instant};

use flume::Receiver;
use tracing::{debug, trace, warn};

use crate::events::{ControllerEvent, LoadOutcome};
use crate::filter::{DocumentInfo, PageFilter, PageKind};
use crate::geometry::{self, AnchorBox, Viewport};
use crate::panel::{LoadToken, PanelLifecycle, PanelState, PanelView};
use crate::preload::{ImageFetcher, Preloader};
use crate::settings::{ModifierState, Settings};
use crate::timer::DebounceTimer;

/// Vertical space reserved when fitting the preview to the viewport.
const HEIGHT_MARGIN: i32 = 30;

/// Pointer-over event as delivered by the host, with the geometry of the
/// hovered element snapshotted at delivery time.
#[derive(Debug, Clone)]
pub struct HoverEvent<N> {
    pub node: N,
    pub anchor: AnchorBox,
    pub viewport: Viewport,
    pub modifiers: ModifierState,
}

/// Callback fired when per-page policy changes through the controller, so
/// the host can refresh its menu indicators.
pub type PolicyListener = Box<dyn Fn(PageKind) + Send + Sync>;

/// The hover waiting on the debounce timer. At most one exists; a newer
/// hover or a panel close replaces or drops it.
struct PendingHover {
    request: u64,
    source: String,
    page: PageKind,
    anchor: AnchorBox,
    viewport: Viewport,
}

/// Wires hover events to the debounce timer, the policy filter, the panel
/// and the preloader. One instance per host window; dropping it tears the
/// preload worker down.
pub struct HoverZoomController<N, V: PanelView> {
    filter: Arc<dyn PageFilter<N>>,
    settings: Arc<dyn Settings>,
    panel: PanelLifecycle<V>,
    preloader: Preloader,
    timer: DebounceTimer,
    pending: Option<PendingHover>,
    outstanding_loads: usize,
    events_rx: Receiver<ControllerEvent>,
    policy_listeners: Vec<PolicyListener>,
}

impl<N, V: PanelView> HoverZoomController<N, V> {
    pub fn new(
        filter: Arc<dyn PageFilter<N>>,
        settings: Arc<dyn Settings>,
        view: V,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Self {
        let (events_tx, events_rx) = flume::unbounded();
        let preloader = Preloader::new(fetcher, events_tx.clone());
        let timer = DebounceTimer::new(events_tx);

        Self {
            filter,
            settings,
            panel: PanelLifecycle::new(view),
            preloader,
            timer,
            pending: None,
            outstanding_loads: 0,
            events_rx,
            policy_listeners: Vec::new(),
        }
    }

    /// Classifies a freshly loaded document. Returns the page kind the host
    /// should attach to subsequent hover events, or `None` (panel closed)
    /// when the page is not supported.
    pub fn on_page_loaded(&mut self, document: &DocumentInfo) -> Option<PageKind> {
        if !document.is_html {
            self.close_panel();
            return None;
        }
        match self.filter.classify(document) {
            Some(page) => {
                debug!(url = %document.url, ?page, "page recognized");
                Some(page)
            }
            None => {
                self.close_panel();
                None
            }
        }
    }

    /// Evaluates hover eligibility and arms the debounce timer.
    ///
    /// The modifier gate and the policy gates run synchronously here, not
    /// at timer fire; any rejection closes the panel (idempotently).
    pub fn on_mouse_over(&mut self, event: HoverEvent<N>, page: PageKind) {
        let Some(source) = self.filter.candidate_source(&event.node, page) else {
            self.close_panel();
            return;
        };
        if !self.settings.modifier_mode().is_satisfied(event.modifiers) {
            self.close_panel();
            return;
        }
        if !self.filter.is_page_enabled(page) || !self.filter.allows_image(&source, page) {
            self.close_panel();
            return;
        }

        self.timer.cancel();
        let delay = Duration::from_millis(u64::from(self.settings.delay_seconds()) * 1000);
        let request = self.timer.arm(delay);
        trace!(%source, request, "hover candidate armed");
        self.pending = Some(PendingHover {
            request,
            source,
            page,
            anchor: event.anchor,
            viewport: event.viewport,
        });
    }

    /// Hovering context is tab-scoped; switching tabs or navigating always
    /// closes the panel and cancels any pending timer.
    pub fn on_tab_changed(&mut self) {
        self.close_panel();
    }

    /// Closes the panel and drops any pending hover. Safe from any state.
    pub fn close_panel(&mut self) {
        self.timer.cancel();
        self.pending = None;
        self.panel.close();
    }

    /// Drains already-delivered events without blocking. Returns the number
    /// of events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Pumps until no timer is armed and no load is outstanding, or until
    /// `timeout` elapses.
    pub fn pump_until_idle(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut handled = self.pump();
        while self.has_pending_work() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.events_rx.recv_timeout(deadline - now) {
                Ok(event) => {
                    self.handle_event(event);
                    handled += 1;
                }
                Err(_) => break,
            }
        }
        handled
    }

    /// Whether a debounce timer is armed or a preload is outstanding.
    pub fn has_pending_work(&self) -> bool {
        self.timer.is_armed() || self.outstanding_loads > 0
    }

    pub fn panel_state(&self) -> PanelState {
        self.panel.state()
    }

    pub fn panel_view(&self) -> &V {
        self.panel.view()
    }

    /// Forwards the toggle to the policy filter and notifies registered
    /// listeners.
    pub fn set_page_enabled(&self, page: PageKind, enabled: bool) {
        debug!(?page, enabled, "page policy toggled");
        self.filter.set_page_enabled(page, enabled);
        for listener in &self.policy_listeners {
            listener(page);
        }
    }

    pub fn is_page_enabled(&self, page: PageKind) -> bool {
        self.filter.is_page_enabled(page)
    }

    pub fn page_name(&self, page: PageKind) -> Option<String> {
        self.filter.page_name(page)
    }

    /// Registers a callback for policy changes made through
    /// [`set_page_enabled`](Self::set_page_enabled).
    pub fn on_policy_changed(&mut self, listener: impl Fn(PageKind) + Send + Sync + 'static) {
        self.policy_listeners.push(Box::new(listener));
    }

    fn handle_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::DebounceFired { request } => self.on_debounce_fired(request),
            ControllerEvent::LoadFinished {
                token,
                anchor,
                viewport,
                outcome,
            } => self.on_load_finished(token, anchor, viewport, outcome),
        }
    }

    fn on_debounce_fired(&mut self, request: u64) {
        if !self.timer.acknowledge(request) {
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };
        debug_assert_eq!(pending.request, request);

        match self.filter.zoom_source(&pending.source, pending.page) {
            Some(zoom) => {
                let token = self.panel.open(&pending.anchor, zoom);
                if self
                    .preloader
                    .load(token.clone(), pending.anchor, pending.viewport)
                {
                    self.outstanding_loads += 1;
                } else {
                    self.panel.close();
                }
            }
            None => {
                trace!(source = %pending.source, "no zoom version");
                self.panel.close();
            }
        }
    }

    fn on_load_finished(
        &mut self,
        token: LoadToken,
        anchor: AnchorBox,
        viewport: Viewport,
        outcome: LoadOutcome,
    ) {
        self.outstanding_loads = self.outstanding_loads.saturating_sub(1);
        if !self.panel.is_current(&token) {
            trace!(source = token.source(), "superseded load dropped");
            return;
        }

        match outcome {
            LoadOutcome::Loaded { width, height } => {
                let side = geometry::available_side(&anchor, viewport.width);
                let size = geometry::fit(width, height, side, viewport.height - HEIGHT_MARGIN);
                self.panel.render(&token, size);
            }
            LoadOutcome::Failed { error } => {
                warn!(source = token.source(), %error, "preview load failed");
                self.panel.close();
            }
        }
    }
}
