//! Element accessor contract
//!
//! The engine never touches a concrete tree: everything it needs to know
//! about a node goes through [`Element`]. [`ElementRef`] from `sieve-dom`
//! is the stock implementation.

use sieve_dom::ElementRef;

/// Read-only view of an element in some document tree.
///
/// A document (root) node is expected to behave as an element too: it
/// has no parent, no attributes, and reports `is_document() == true`.
pub trait Element: Copy + Eq {
    /// Lowercase tag name
    fn tag_name(&self) -> &str;

    fn id(&self) -> Option<&str>;

    /// Class membership, ASCII case-insensitive
    fn has_class(&self, class: &str) -> bool;

    /// Attribute value by (lowercase) name
    fn attr(&self, name: &str) -> Option<&str>;

    /// Names of all attributes present
    fn attribute_names(&self) -> Vec<&str>;

    fn parent(&self) -> Option<Self>;

    /// Element children in document order
    fn children(&self) -> Vec<Self>;

    fn is_document(&self) -> bool;

    /// Whether the element has child nodes other than comments
    fn has_content_children(&self) -> bool;

    /// Descendant text with whitespace collapsed
    fn text(&self) -> String;

    /// Text of direct text children only
    fn own_text(&self) -> String;

    /// Non-rendered payload (script/style data) of the subtree
    fn data(&self) -> String;

    /// 0-based index among the parent's element children; 0 without a parent
    fn element_sibling_index(&self) -> usize {
        self.parent()
            .and_then(|parent| parent.children().iter().position(|child| child == self))
            .unwrap_or(0)
    }

    /// The element child right before this one
    fn previous_element_sibling(&self) -> Option<Self> {
        let siblings = self.parent()?.children();
        let index = siblings.iter().position(|child| child == self)?;
        index.checked_sub(1).map(|prev| siblings[prev])
    }

    /// All earlier element siblings, nearest first
    fn previous_element_siblings(&self) -> Vec<Self> {
        let Some(parent) = self.parent() else {
            return Vec::new();
        };
        let siblings = parent.children();
        match siblings.iter().position(|child| child == self) {
            Some(index) => siblings[..index].iter().rev().copied().collect(),
            None => Vec::new(),
        }
    }

    /// Every element below this one in document order, excluding itself
    fn descendants(&self) -> Vec<Self> {
        let mut result = Vec::new();
        let mut stack: Vec<Self> = self.children().into_iter().rev().collect();
        while let Some(element) = stack.pop() {
            result.push(element);
            stack.extend(element.children().into_iter().rev());
        }
        result
    }
}

impl Element for ElementRef<'_> {
    fn tag_name(&self) -> &str {
        ElementRef::tag_name(self)
    }

    fn id(&self) -> Option<&str> {
        ElementRef::id(self)
    }

    fn has_class(&self, class: &str) -> bool {
        ElementRef::has_class(self, class)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        ElementRef::attr(self, name)
    }

    fn attribute_names(&self) -> Vec<&str> {
        ElementRef::attribute_names(self).collect()
    }

    fn parent(&self) -> Option<Self> {
        ElementRef::parent(self)
    }

    fn children(&self) -> Vec<Self> {
        ElementRef::children(self)
    }

    fn is_document(&self) -> bool {
        ElementRef::is_document(self)
    }

    fn has_content_children(&self) -> bool {
        ElementRef::has_content_children(self)
    }

    fn text(&self) -> String {
        ElementRef::text(self)
    }

    fn own_text(&self) -> String {
        ElementRef::own_text(self)
    }

    fn data(&self) -> String {
        ElementRef::data_text(self)
    }
}
