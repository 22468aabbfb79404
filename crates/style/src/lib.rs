pub mod align;
pub mod font;
pub mod text;

pub use align::{HorizontalAlign, VerticalAlign};
pub use font::{FONT_WEIGHTS, FontStyle, FontWeight, StyleError};
pub use text::TextAlign;
