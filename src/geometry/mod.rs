pub mod scale;
pub mod viewport;

pub use scale::{fit, ScaledSize};
pub use viewport::{available_side, AnchorBox, Viewport};
