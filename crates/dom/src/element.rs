//! Borrowed element handles

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::node::{ElementData, Node, NodeId, NodeType};
use crate::tree::DomTree;

/// A cheap, copyable reference to an element (or the document) inside a [`DomTree`].
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub(crate) fn new(tree: &'a DomTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    /// The node ID behind this handle
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// The tree this element lives in
    pub fn tree(&self) -> &'a DomTree {
        self.tree
    }

    fn node(&self) -> Option<&'a Node> {
        self.tree.get(self.id)
    }

    /// Element data, `None` for the document node
    pub fn data(&self) -> Option<&'a ElementData> {
        self.node().and_then(Node::as_element)
    }

    pub fn is_document(&self) -> bool {
        self.node().is_some_and(Node::is_document)
    }

    pub fn tag_name(&self) -> &'a str {
        self.node().and_then(Node::tag_name).unwrap_or_default()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.data().and_then(|data| data.get_attribute(name))
    }

    pub fn id(&self) -> Option<&'a str> {
        self.data().and_then(ElementData::id)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.data().is_some_and(|data| data.has_class(class))
    }

    /// Attribute names in no particular order
    pub fn attribute_names(&self) -> impl Iterator<Item = &'a str> {
        self.data()
            .into_iter()
            .flat_map(|data| data.attributes.keys().map(String::as_str))
    }

    /// Parent element; the document counts as an element here
    pub fn parent(&self) -> Option<ElementRef<'a>> {
        self.node()
            .and_then(|node| node.parent)
            .and_then(|parent| self.tree.element(parent))
    }

    /// Element children in document order
    pub fn children(&self) -> Vec<ElementRef<'a>> {
        self.tree
            .element_children(self.id)
            .into_iter()
            .map(|id| ElementRef::new(self.tree, id))
            .collect()
    }

    /// Whether the node has any child besides comments
    pub fn has_content_children(&self) -> bool {
        self.tree.children(self.id).into_iter().any(|child| {
            self.tree
                .get(child)
                .is_some_and(|node| !matches!(node.node_type, NodeType::Comment(_)))
        })
    }

    /// Descendant text, whitespace collapsed
    pub fn text(&self) -> String {
        self.tree.text_content(self.id)
    }

    /// Direct text children only, whitespace collapsed
    pub fn own_text(&self) -> String {
        self.tree.own_text(self.id)
    }

    /// Script/style payload and comments in the subtree
    pub fn data_text(&self) -> String {
        self.tree.data_content(self.id)
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl Eq for ElementRef<'_> {}

impl Hash for ElementRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        std::ptr::hash(self.tree, state);
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag_name())?;
        if let Some(id) = self.id() {
            write!(f, " id=\"{}\"", id)?;
        }
        write!(f, "> ({})", self.id)
    }
}
