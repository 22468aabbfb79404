//! Markup tree construction and traversal.
//!
//! The renderer only needs three things from markup: attribute lookup, child
//! enumeration and a depth-first walk. [`MarkupElement`] is that capability;
//! [`MarkupTree`] is the `quick-xml` backed implementation.

pub mod entities;
mod tree;
mod walker;

pub use entities::decode_entities;
pub use tree::{MarkupNode, MarkupTree};
pub use walker::{TreeWalker, walk};

/// Attribute naming the annotated node type.
pub const TYPE_ATTRIBUTE: &str = "data-svelte-pdf-kit-type";
pub const OPTIONS_ATTRIBUTE: &str = "data-svelte-pdf-kit-options";
pub const FONT_ATTRIBUTE: &str = "data-svelte-pdf-kit-font";
pub const FONT_STYLE_ATTRIBUTE: &str = "data-svelte-pdf-kit-font-style";
pub const FONT_WEIGHT_ATTRIBUTE: &str = "data-svelte-pdf-kit-font-weight";
pub const FONT_FAMILY_ATTRIBUTE: &str = "data-svelte-pdf-kit-font-family";
pub const FONTS_ATTRIBUTE: &str = "data-svelte-pdf-kit-fonts";
pub const SRC_ATTRIBUTE: &str = "src";

/// A node of a parsed markup tree, as seen by the walker.
pub trait MarkupElement: Sized {
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Direct children in document order, text nodes included.
    fn child_elements(&self) -> Vec<Self>;

    /// The non-empty node type, if this node is annotated.
    fn node_type(&self) -> Option<&str> {
        self.attribute(TYPE_ATTRIBUTE).filter(|t| !t.is_empty())
    }
}
