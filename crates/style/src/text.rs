use serde::{Deserialize, Serialize};

/// Horizontal alignment of wrapped text lines.
///
/// `Justify` is accepted in option payloads but laid out like `Left`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Justify,
}
