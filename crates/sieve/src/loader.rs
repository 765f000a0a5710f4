//! JSON element trees
//!
//! ```json
//! [{"tag": "ul", "attrs": {"id": "menu"}, "children": [
//!     {"tag": "li", "text": "Home"},
//!     {"tag": "script", "data": "var x = 1;"}
//! ]}]
//! ```
//!
//! A node with a `tag` becomes an element; its `text` and `data` become
//! its first children. A node without a tag is a bare text or data node.

use std::collections::BTreeMap;

use log::warn;
use serde::Deserialize;

use sieve_dom::{DomTree, NodeId};

use crate::error::CliResult;

/// One node of the input document
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    #[serde(default)]
    pub tag: Option<String>,

    #[serde(default)]
    pub attrs: BTreeMap<String, String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub data: Option<String>,

    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

/// Build a document from a JSON list of top-level nodes
pub fn load_tree(json: &str) -> CliResult<DomTree> {
    let nodes: Vec<NodeSpec> = serde_json::from_str(json)?;
    let mut tree = DomTree::new();
    let document = tree.document_id();
    for node in &nodes {
        append_node(&mut tree, document, node)?;
    }
    Ok(tree)
}

fn append_node(tree: &mut DomTree, parent: NodeId, node: &NodeSpec) -> CliResult<()> {
    let Some(tag) = node.tag.as_deref() else {
        if !node.children.is_empty() || !node.attrs.is_empty() {
            warn!("Skipping node with children or attributes but no tag");
            return Ok(());
        }
        match (&node.text, &node.data) {
            (Some(text), _) => {
                tree.append_text(parent, text)?;
            }
            (None, Some(data)) => {
                tree.append_data(parent, data)?;
            }
            (None, None) => warn!("Skipping empty node"),
        }
        return Ok(());
    };

    if tag.trim().is_empty() {
        warn!("Skipping element with an empty tag");
        return Ok(());
    }

    let attributes: Vec<(&str, &str)> = node
        .attrs
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    let element = tree.append_element(parent, tag.trim(), &attributes)?;

    if let Some(text) = &node.text {
        tree.append_text(element, text)?;
    }
    if let Some(data) = &node.data {
        tree.append_data(element, data)?;
    }
    for child in &node.children {
        append_node(tree, element, child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sieve_select::select_query;

    const MENU: &str = r#"[
        {"tag": "html", "children": [
            {"tag": "body", "children": [
                {"tag": "UL", "attrs": {"id": "menu", "Class": "nav top"}, "children": [
                    {"tag": "li", "text": "Home"},
                    {"tag": "li", "children": [{"text": "About "}, {"tag": "b", "text": "us"}]},
                    {"tag": "script", "data": "var bye = 1;"}
                ]}
            ]}
        ]}
    ]"#;

    #[test]
    fn test_load_structure() {
        let tree = load_tree(MENU).unwrap();
        let ul = select_query("#menu", tree.document()).unwrap();
        assert_eq!(ul.len(), 1);
        assert_eq!(ul[0].tag_name(), "ul");
        assert!(ul[0].has_class("NAV"));
        assert_eq!(ul[0].children().len(), 3);
    }

    #[test]
    fn test_load_text_and_data() {
        let tree = load_tree(MENU).unwrap();
        assert_eq!(select_query("li:contains(about us)", tree.document()).unwrap().len(), 1);
        assert_eq!(select_query("li:containsOwn(us)", tree.document()).unwrap().len(), 0);
        assert_eq!(select_query("script:containsData(bye)", tree.document()).unwrap().len(), 1);
    }

    #[test]
    fn test_skips_malformed_nodes() {
        let tree = load_tree(r#"[{"children": [{"tag": "p"}]}, {}, {"tag": "p"}]"#).unwrap();
        assert_eq!(select_query("p", tree.document()).unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(load_tree("{\"tag\": ").is_err());
        assert!(load_tree("{\"tag\": \"p\"}").is_err());
    }
}
