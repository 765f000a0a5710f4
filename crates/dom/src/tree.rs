//! DOM Tree structure

use log::trace;
use rustc_hash::FxHashMap;
use std::fmt;

use crate::element::ElementRef;
use crate::error::{DomError, DomResult};
use crate::node::{ElementData, Node, NodeId, NodeType};

/// DOM tree that owns all nodes
pub struct DomTree {
    /// All nodes in the tree
    nodes: FxHashMap<NodeId, Node>,
    /// Next available node ID
    next_id: u32,
    /// Root document node
    document_id: NodeId,
}

impl DomTree {
    /// Create a new empty DOM tree
    pub fn new() -> Self {
        let document_id = NodeId::new(0);
        let document = Node::new(document_id, NodeType::Document);

        let mut nodes = FxHashMap::default();
        nodes.insert(document_id, document);

        Self {
            nodes,
            next_id: 1,
            document_id,
        }
    }

    /// Get the document (root) node ID
    pub fn document_id(&self) -> NodeId {
        self.document_id
    }

    /// The document node as a selectable element
    pub fn document(&self) -> ElementRef<'_> {
        ElementRef::new(self, self.document_id)
    }

    /// Get a selectable handle for an element (or the document) node
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.get(id)
            .filter(|node| node.is_element_like())
            .map(|_| ElementRef::new(self, id))
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    fn insert(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(id, node_type));
        id
    }

    /// Create a new detached element node
    pub fn create_element(&mut self, tag_name: impl Into<String>) -> NodeId {
        self.insert(NodeType::Element(ElementData::new(tag_name)))
    }

    /// Create a new detached text node
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.insert(NodeType::Text(content.into()))
    }

    /// Create a new detached data node (script or style payload)
    pub fn create_data(&mut self, content: impl Into<String>) -> NodeId {
        self.insert(NodeType::Data(content.into()))
    }

    /// Create a new detached comment node
    pub fn create_comment(&mut self, content: impl Into<String>) -> NodeId {
        self.insert(NodeType::Comment(content.into()))
    }

    /// Set an attribute on an element node
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> DomResult<()> {
        let element = self
            .get_mut(id)
            .ok_or(DomError::NodeNotFound(id.0))?
            .as_element_mut()
            .ok_or(DomError::NodeNotFound(id.0))?;
        element.set_attribute(name, value);
        Ok(())
    }

    /// Attach a detached node as the last child of `parent_id`.
    ///
    /// Only the document and elements take children, and a node can be
    /// attached once.
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> DomResult<()> {
        match self.get(parent_id) {
            None => return Err(DomError::NodeNotFound(parent_id.0)),
            Some(parent) if !parent.is_container() => {
                return Err(DomError::NotAContainer { parent: parent_id.0, child: child_id.0 });
            }
            Some(_) => {}
        }

        let child = self.get_mut(child_id).ok_or(DomError::NodeNotFound(child_id.0))?;
        if child.parent.is_some() {
            return Err(DomError::AlreadyAttached(child_id.0));
        }
        child.parent = Some(parent_id);

        if let Some(parent) = self.get_mut(parent_id) {
            parent.children.push(child_id);
        }
        trace!("Appended node {} to {}", child_id.0, parent_id.0);
        Ok(())
    }

    /// Create an element with attributes and append it to `parent_id`
    pub fn append_element(
        &mut self,
        parent_id: NodeId,
        tag_name: &str,
        attributes: &[(&str, &str)],
    ) -> DomResult<NodeId> {
        let id = self.create_element(tag_name);
        for (name, value) in attributes {
            self.set_attribute(id, *name, *value)?;
        }
        self.append_child(parent_id, id)?;
        Ok(id)
    }

    /// Create a text node and append it to `parent_id`
    pub fn append_text(&mut self, parent_id: NodeId, content: &str) -> DomResult<NodeId> {
        let id = self.create_text(content);
        self.append_child(parent_id, id)?;
        Ok(id)
    }

    /// Create a data node and append it to `parent_id`
    pub fn append_data(&mut self, parent_id: NodeId, content: &str) -> DomResult<NodeId> {
        let id = self.create_data(content);
        self.append_child(parent_id, id)?;
        Ok(id)
    }

    /// Get all children of a node
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|n| n.children.to_vec())
            .unwrap_or_default()
    }

    /// Children that take part in selector matching, in document order
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|&child| self.get(child).is_some_and(Node::is_element))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Iterate over all descendants of a node (depth-first)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        self.collect_descendants(id, &mut result);
        result
    }

    fn collect_descendants(&self, id: NodeId, result: &mut Vec<NodeId>) {
        if let Some(node) = self.get(id) {
            for &child_id in &node.children {
                result.push(child_id);
                self.collect_descendants(child_id, result);
            }
        }
    }

    /// Text of a node and all its descendants, whitespace collapsed
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.collect_text(id, &mut result);
        normalize_whitespace(&result)
    }

    fn collect_text(&self, id: NodeId, result: &mut String) {
        if let Some(node) = self.get(id) {
            match &node.node_type {
                NodeType::Text(text) => result.push_str(text),
                NodeType::Document | NodeType::Element(_) => {
                    for &child_id in &node.children {
                        self.collect_text(child_id, result);
                    }
                }
                NodeType::Data(_) | NodeType::Comment(_) => {}
            }
        }
    }

    /// Text of the direct text children only, whitespace collapsed
    pub fn own_text(&self, id: NodeId) -> String {
        let raw: String = self
            .children(id)
            .into_iter()
            .filter_map(|child| self.get(child).and_then(Node::as_text))
            .collect();
        normalize_whitespace(&raw)
    }

    /// Non-rendered data held by a node's subtree (data nodes and comments)
    pub fn data_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        for node_id in self.descendants(id) {
            match self.get(node_id).map(|n| &n.node_type) {
                Some(NodeType::Data(data)) | Some(NodeType::Comment(data)) => {
                    result.push_str(data)
                }
                _ => {}
            }
        }
        result
    }

    /// Get the number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (only has document node)
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DomTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomTree")
            .field("document", &self.document_id)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}
