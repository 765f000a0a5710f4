//! Test documents, built the way an HTML tree builder would lay them out

use sieve_dom::{DomTree, ElementRef, NodeId};

/// `document > html > (head, body)`, returning the tree and the body id
fn skeleton() -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let html = tree.append_element(tree.document_id(), "html", &[]).unwrap();
    tree.append_element(html, "head", &[]).unwrap();
    let body = tree.append_element(html, "body", &[]).unwrap();
    (tree, body)
}

/// `p#0.ONE.two`, `p#1.one`, `p#2.two` as siblings under body; the first
/// one owns the text "test"
pub fn three_paragraphs() -> DomTree {
    let (mut tree, body) = skeleton();
    let first = tree
        .append_element(body, "p", &[("id", "0"), ("class", "ONE two")])
        .unwrap();
    tree.append_text(first, "test").unwrap();
    tree.append_element(body, "p", &[("id", "1"), ("class", "one")]).unwrap();
    tree.append_element(body, "p", &[("id", "2"), ("class", "two")]).unwrap();
    tree
}

/// Nine empty sibling paragraphs under body
pub fn nine_paragraphs() -> DomTree {
    let (mut tree, body) = skeleton();
    for _ in 0..9 {
        tree.append_element(body, "p", &[]).unwrap();
    }
    tree
}

/// Two divs holding paragraphs numbered 1..=3 and 4..=6
pub fn numbered_divs() -> DomTree {
    let (mut tree, body) = skeleton();
    for group in [1..=3, 4..=6] {
        let div = tree.append_element(body, "div", &[]).unwrap();
        for n in group {
            let p = tree.append_element(div, "p", &[]).unwrap();
            tree.append_text(p, &n.to_string()).unwrap();
        }
    }
    tree
}

/// An empty div followed by a paragraph, plus mixed text, a script and a
/// commented-out div:
///
/// ```text
/// body
///   div.empty
///   p#intro     "Hello " <b>there</b> " World"
///   script      data "var bye = 1;"
///   div#note    <!-- note -->
///   ul > li.a[data-x=1]  li  li[lang=en-GB]
/// ```
pub fn mixed_content() -> DomTree {
    let (mut tree, body) = skeleton();
    tree.append_element(body, "div", &[("class", "empty")]).unwrap();

    let p = tree.append_element(body, "p", &[("id", "intro")]).unwrap();
    tree.append_text(p, "Hello ").unwrap();
    let b = tree.append_element(p, "b", &[]).unwrap();
    tree.append_text(b, "there").unwrap();
    tree.append_text(p, " World").unwrap();

    let script = tree.append_element(body, "script", &[]).unwrap();
    tree.append_data(script, "var bye = 1;").unwrap();

    let note = tree.append_element(body, "div", &[("id", "note")]).unwrap();
    let comment = tree.create_comment(" note ");
    tree.append_child(note, comment).unwrap();

    let ul = tree.append_element(body, "ul", &[]).unwrap();
    tree.append_element(ul, "li", &[("class", "a"), ("data-x", "1")]).unwrap();
    tree.append_element(ul, "li", &[]).unwrap();
    tree.append_element(ul, "li", &[("lang", "en-GB")]).unwrap();
    tree
}

/// Every element with `tag`, in document order
pub fn by_tag<'a>(tree: &'a DomTree, tag: &str) -> Vec<ElementRef<'a>> {
    tree.descendants(tree.document_id())
        .into_iter()
        .filter_map(|id| tree.element(id))
        .filter(|element| element.tag_name() == tag)
        .collect()
}
