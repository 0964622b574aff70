//! Hover-triggered zoom-preview controller.
//!
//! Resting the pointer over a qualifying thumbnail arms a debounce timer;
//! when it fires, the full-resolution image is preloaded off-screen and
//! shown in a floating panel beside the thumbnail, scaled to fit whichever
//! side of the viewport has more room. The host supplies page
//! classification, configuration, the panel widget, and the image-loading
//! primitive through traits, delivers pointer/page/tab events, and drains
//! the controller's event channel from its main loop.

pub mod controller;
pub mod events;
pub mod filter;
pub mod geometry;
pub mod panel;
pub mod preload;
pub mod settings;
pub mod timer;

pub use controller::{HoverEvent, HoverZoomController};
pub use events::{ControllerEvent, LoadOutcome};
pub use filter::{DocumentInfo, PageFilter, PageKind};
pub use geometry::{AnchorBox, ScaledSize, Viewport};
pub use panel::{LoadToken, PanelLifecycle, PanelState, PanelView};
pub use preload::{FileFetcher, ImageDims, ImageFetcher, Preloader};
pub use settings::{MemorySettings, ModifierMode, ModifierState, Settings};
