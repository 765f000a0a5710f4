//! DOM Node representation

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use string_cache::DefaultAtom;

/// Tag name reported by the document node itself
pub const ROOT_TAG: &str = "#root";

/// Unique identifier for a node in the DOM tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Type of DOM node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    /// Document root node
    Document,
    /// Element node
    Element(ElementData),
    /// Rendered text content
    Text(String),
    /// Non-rendered payload, e.g. the body of a script or style element
    Data(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Tag name (lowercase, interned)
    pub tag_name: DefaultAtom,
    /// Element attributes, keyed by lowercase name
    pub attributes: FxHashMap<String, String>,
}

impl ElementData {
    /// Create a new element with the given tag name
    pub fn new(tag_name: impl Into<String>) -> Self {
        let tag_name: String = tag_name.into();
        Self {
            tag_name: DefaultAtom::from(tag_name.to_ascii_lowercase()),
            attributes: FxHashMap::default(),
        }
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(&name.to_ascii_lowercase()).map(|s| s.as_str())
    }

    /// Set an attribute value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into().to_ascii_lowercase(), value.into());
    }

    /// Check if the element has a class (ASCII case-insensitive)
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c.eq_ignore_ascii_case(class))
    }

    /// Get the element's ID
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// Iterate over the whitespace-separated class names
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attribute("class")
            .unwrap_or_default()
            .split_whitespace()
    }
}

/// A node in the DOM tree
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,
    /// Node type and associated data
    pub node_type: NodeType,
    /// Parent node ID (None for root and detached nodes)
    pub parent: Option<NodeId>,
    /// Child node IDs in document order
    pub children: SmallVec<[NodeId; 8]>,
}

impl Node {
    /// Create a new node
    pub fn new(id: NodeId, node_type: NodeType) -> Self {
        Self {
            id,
            node_type,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Check if this is a document node
    pub fn is_document(&self) -> bool {
        matches!(self.node_type, NodeType::Document)
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        matches!(self.node_type, NodeType::Element(_))
    }

    /// Whether selectors treat this node as an element.
    ///
    /// The document node takes part in matching under the `#root` tag name.
    pub fn is_element_like(&self) -> bool {
        matches!(self.node_type, NodeType::Document | NodeType::Element(_))
    }

    /// Whether this node may hold children
    pub fn is_container(&self) -> bool {
        self.is_element_like()
    }

    /// Get element data if this is an element
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Get mutable element data if this is an element
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    pub fn as_text(&self) -> Option<&str> {
        match &self.node_type {
            NodeType::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the tag name; the document answers with [`ROOT_TAG`]
    pub fn tag_name(&self) -> Option<&str> {
        match &self.node_type {
            NodeType::Document => Some(ROOT_TAG),
            NodeType::Element(data) => Some(&data.tag_name),
            _ => None,
        }
    }
}
