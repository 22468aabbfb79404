use super::MarkupElement;
use crate::error::RenderError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

// Elements that never have children in HTML, whether or not they are
// written self-closing.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

#[derive(Debug)]
enum NodeKind {
    Root,
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    children: Vec<usize>,
}

/// An owned markup tree. Attribute values and text are kept exactly as
/// written; entity references are not decoded here.
#[derive(Debug)]
pub struct MarkupTree {
    nodes: Vec<NodeData>,
}

impl MarkupTree {
    /// Parses HTML-flavoured markup. Mismatched or stray end tags are
    /// tolerated, unclosed elements are closed at the end of input.
    pub fn parse(markup: &str) -> Result<Self, RenderError> {
        let mut reader = Reader::from_str(markup);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.allow_dangling_amp = true;

        let mut tree = MarkupTree {
            nodes: vec![NodeData {
                kind: NodeKind::Root,
                children: Vec::new(),
            }],
        };
        // Open elements as (node index, lowercase tag name); index 0 is the root.
        let mut open: Vec<(usize, String)> = vec![(0, String::new())];

        loop {
            let parent = open.last().map(|(index, _)| *index).unwrap_or(0);
            match reader.read_event()? {
                Event::Start(e) => {
                    let (name, attributes) = element_parts(&e)?;
                    let is_void = VOID_ELEMENTS.contains(&name.as_str());
                    let index = tree.push(parent, NodeKind::Element {
                        name: name.clone(),
                        attributes,
                    });
                    if !is_void {
                        open.push((index, name));
                    }
                }
                Event::Empty(e) => {
                    let (name, attributes) = element_parts(&e)?;
                    tree.push(parent, NodeKind::Element { name, attributes });
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                    if let Some(depth) = open.iter().skip(1).rposition(|(_, n)| *n == name) {
                        open.truncate(depth + 1);
                    }
                }
                Event::Text(e) => {
                    let text = e.decode().map_err(|err| RenderError::Markup(err.to_string()))?;
                    tree.push_text(parent, &text);
                }
                Event::GeneralRef(e) => {
                    let name = e.decode().map_err(|err| RenderError::Markup(err.to_string()))?;
                    tree.push_text(parent, &format!("&{};", name));
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    tree.push_text(parent, &text);
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(tree)
    }

    pub fn root(&self) -> MarkupNode<'_> {
        MarkupNode {
            tree: self,
            index: 0,
        }
    }

    fn push(&mut self, parent: usize, kind: NodeKind) -> usize {
        let index = self.nodes.len();
        self.nodes.push(NodeData {
            kind,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(index);
        index
    }

    // Adjacent text events (text, entity reference, text) share one node.
    fn push_text(&mut self, parent: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(&last) = self.nodes[parent].children.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last].kind {
                existing.push_str(text);
                return;
            }
        }
        self.push(parent, NodeKind::Text(text.to_string()));
    }
}

fn element_parts(e: &BytesStart<'_>) -> Result<(String, Vec<(String, String)>), RenderError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
    let mut attributes = Vec::new();
    for attr in e.html_attributes() {
        let attr = attr.map_err(|err| RenderError::Markup(err.to_string()))?;
        attributes.push((
            String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase(),
            String::from_utf8_lossy(&attr.value).into_owned(),
        ));
    }
    Ok((name, attributes))
}

/// A borrowed handle to one node of a [`MarkupTree`].
#[derive(Debug, Clone, Copy)]
pub struct MarkupNode<'a> {
    tree: &'a MarkupTree,
    index: usize,
}

impl<'a> MarkupNode<'a> {
    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.index]
    }

    /// Lowercase tag name; `None` for text nodes and the root.
    pub fn tag(&self) -> Option<&'a str> {
        match &self.data().kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Raw value of an attribute. Names compare case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        match &self.data().kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = MarkupNode<'a>> + 'a {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&index| MarkupNode { tree, index })
    }

    /// The raw text of every descendant text node, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self.index];
        while let Some(index) = stack.pop() {
            let node = &self.tree.nodes[index];
            if let NodeKind::Text(text) = &node.kind {
                out.push_str(text);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

impl<'a> MarkupElement for MarkupNode<'a> {
    fn attribute(&self, name: &str) -> Option<&str> {
        MarkupNode::attribute(self, name)
    }

    fn child_elements(&self) -> Vec<Self> {
        self.children().collect()
    }
}
