//! Horizontal space available beside the hovered element.

/// Keep the preview off the very edge of the viewport.
const SIDE_MARGIN: i32 = 20;

/// Viewport dimensions at the time of the hover, in display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

/// Geometry snapshot of the hovered element, taken by the host when the
/// hover event is delivered.
///
/// `offset_lefts` holds the element's horizontal offset plus the offset of
/// each containing block up the chain; their sum is the element's absolute
/// left edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorBox {
    pub offset_lefts: Vec<i32>,
    pub width: i32,
}

impl AnchorBox {
    pub fn new(offset_lefts: Vec<i32>, width: i32) -> Self {
        Self {
            offset_lefts,
            width,
        }
    }

    /// Absolute left edge of the anchor within the viewport.
    pub fn absolute_left(&self) -> i32 {
        self.offset_lefts.iter().sum()
    }
}

/// Width available on whichever side of the anchor has more room, minus a
/// fixed margin.
///
/// No lower clamp: a cramped layout can produce a small or even negative
/// value, and the aspect-fit step downstream deals with it.
pub fn available_side(anchor: &AnchorBox, viewport_width: i32) -> i32 {
    let left = anchor.absolute_left();
    let right = viewport_width - left - anchor.width;
    left.max(right) - SIDE_MARGIN
}
