//! Page classification and URL policy, supplied by the host.
//!
//! The controller never inspects page content itself; everything it knows
//! about a page or a hovered node comes through [`PageFilter`]. The node
//! type `N` is the host's own element handle and stays opaque here.

/// A recognized site/template category for which hover zoom is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKind(pub u32);

/// Document identity delivered with page-load events.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub url: String,
    /// Whether the loaded document is an HTML document at all; frames and
    /// media documents come through the same load path.
    pub is_html: bool,
}

impl DocumentInfo {
    pub fn html(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_html: true,
        }
    }
}

/// Host collaborator that classifies pages and resolves image URLs.
pub trait PageFilter<N>: Send + Sync {
    /// Matches a loaded document against the supported site patterns.
    fn classify(&self, document: &DocumentInfo) -> Option<PageKind>;

    /// Extracts the thumbnail image URL under the pointer, or `None` if the
    /// node is not a qualifying image for this page kind.
    fn candidate_source(&self, node: &N, page: PageKind) -> Option<String>;

    /// Whether hover zoom is enabled for this page kind.
    fn is_page_enabled(&self, page: PageKind) -> bool;

    /// Toggles hover zoom for this page kind.
    fn set_page_enabled(&self, page: PageKind, enabled: bool);

    /// Per-image policy filter applied on top of the page gate.
    fn allows_image(&self, source: &str, page: PageKind) -> bool;

    /// Resolves the thumbnail URL to the full-resolution zoom URL, or
    /// `None` when no zoom version exists.
    fn zoom_source(&self, source: &str, page: PageKind) -> Option<String>;

    /// Human-readable page name, for host menu indicators.
    fn page_name(&self, page: PageKind) -> Option<String>;
}
