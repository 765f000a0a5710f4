//! Evaluator tree
//!
//! The compiled form of a selector. Every node answers one question:
//! does `element` match, given that the search started at `root`?

use std::fmt;

use regex::Regex;

use crate::element::Element;
use crate::nth::NthExpr;

/// Attribute value operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOp {
    /// [attr=value]
    Equals,
    /// [attr!=value]
    NotEquals,
    /// [attr^=value]
    Prefix,
    /// [attr$=value]
    Suffix,
    /// [attr*=value]
    Contains,
}

impl AttributeOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::Prefix => "^=",
            Self::Suffix => "$=",
            Self::Contains => "*=",
        }
    }
}

/// Which siblings an nth pseudo-class counts, and from which end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NthKind {
    /// :nth-child
    Child,
    /// :nth-last-child
    LastChild,
    /// :nth-of-type
    OfType,
    /// :nth-last-of-type
    LastOfType,
}

impl NthKind {
    pub fn pseudo_name(self) -> &'static str {
        match self {
            Self::Child => "nth-child",
            Self::LastChild => "nth-last-child",
            Self::OfType => "nth-of-type",
            Self::LastOfType => "nth-last-of-type",
        }
    }

    fn of_type(self) -> bool {
        matches!(self, Self::OfType | Self::LastOfType)
    }

    fn from_end(self) -> bool {
        matches!(self, Self::LastChild | Self::LastOfType)
    }
}

/// A compiled selector node
#[derive(Debug, Clone)]
pub enum Evaluator {
    /// `*`, or `*tag` when a name follows the star
    Universal(Option<String>),
    /// The element the search started from
    Root,
    Tag(String),
    Id(String),
    Class(String),
    /// [attr]
    Attribute(String),
    /// [^prefix]: some attribute name starts with prefix
    AttributeStarting(String),
    AttributeValue {
        key: String,
        op: AttributeOp,
        value: String,
    },
    /// [attr~=regex]
    AttributeMatches { key: String, pattern: Regex },
    IndexLessThan(i32),
    IndexGreaterThan(i32),
    IndexEquals(i32),
    Nth { kind: NthKind, expr: NthExpr },
    FirstChild,
    LastChild,
    FirstOfType,
    LastOfType,
    OnlyChild,
    OnlyOfType,
    Empty,
    /// :root
    IsRoot,
    ContainsText(String),
    ContainsOwnText(String),
    ContainsData(String),
    Matches(Regex),
    MatchesOwn(Regex),
    Has(Box<Evaluator>),
    Not(Box<Evaluator>),
    And(Vec<Evaluator>),
    Or(Vec<Evaluator>),
    /// Child combinator: the parent must match
    ImmediateParent(Box<Evaluator>),
    /// Descendant combinator: some ancestor (up to the root) must match
    Ancestor(Box<Evaluator>),
    /// Next-sibling combinator: the previous element sibling must match
    PreviousSibling(Box<Evaluator>),
    /// Subsequent-sibling combinator: some earlier element sibling must match
    PreviousSiblings(Box<Evaluator>),
}

impl Evaluator {
    /// Test `element`, found while searching from `root`
    pub fn matches<E: Element>(&self, element: E, root: E) -> bool {
        match self {
            Self::Universal(None) => true,
            Self::Universal(Some(tag)) | Self::Tag(tag) => {
                element.tag_name().eq_ignore_ascii_case(tag)
            }
            Self::Root => element == root,
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Class(class) => element.has_class(class),
            Self::Attribute(key) => element.attr(key).is_some(),
            Self::AttributeStarting(prefix) => element
                .attribute_names()
                .iter()
                .any(|name| name.to_ascii_lowercase().starts_with(prefix.as_str())),
            Self::AttributeValue { key, op, value } => {
                matches_attribute(element.attr(key), *op, value)
            }
            Self::AttributeMatches { key, pattern } => {
                element.attr(key).is_some_and(|actual| pattern.is_match(actual))
            }

            Self::IndexLessThan(index) => sibling_index(element) < i64::from(*index),
            Self::IndexGreaterThan(index) => sibling_index(element) > i64::from(*index),
            Self::IndexEquals(index) => sibling_index(element) == i64::from(*index),

            Self::Nth { kind, expr } => nth_position(element, *kind)
                .is_some_and(|position| expr.matches(position)),
            Self::FirstChild => nth_position(element, NthKind::Child) == Some(1),
            Self::LastChild => nth_position(element, NthKind::LastChild) == Some(1),
            Self::FirstOfType => nth_position(element, NthKind::OfType) == Some(1),
            Self::LastOfType => nth_position(element, NthKind::LastOfType) == Some(1),
            Self::OnlyChild => {
                nth_position(element, NthKind::Child) == Some(1)
                    && nth_position(element, NthKind::LastChild) == Some(1)
            }
            Self::OnlyOfType => {
                nth_position(element, NthKind::OfType) == Some(1)
                    && nth_position(element, NthKind::LastOfType) == Some(1)
            }
            Self::Empty => !element.has_content_children(),
            Self::IsRoot => {
                let scope_root = if root.is_document() {
                    root.children().first().copied()
                } else {
                    Some(root)
                };
                scope_root == Some(element)
            }

            Self::ContainsText(text) => element.text().to_ascii_lowercase().contains(text.as_str()),
            Self::ContainsOwnText(text) => {
                element.own_text().to_ascii_lowercase().contains(text.as_str())
            }
            Self::ContainsData(data) => element.data().to_ascii_lowercase().contains(data.as_str()),
            Self::Matches(pattern) => pattern.is_match(&element.text()),
            Self::MatchesOwn(pattern) => pattern.is_match(&element.own_text()),

            Self::Has(inner) => element
                .descendants()
                .into_iter()
                .any(|descendant| inner.matches(descendant, element)),
            Self::Not(inner) => !inner.matches(element, root),

            Self::And(evaluators) => evaluators.iter().all(|e| e.matches(element, root)),
            Self::Or(evaluators) => evaluators.iter().any(|e| e.matches(element, root)),

            Self::ImmediateParent(inner) => {
                element != root
                    && element.parent().is_some_and(|parent| inner.matches(parent, root))
            }
            Self::Ancestor(inner) => {
                if element == root {
                    return false;
                }
                let mut current = element.parent();
                while let Some(ancestor) = current {
                    if inner.matches(ancestor, root) {
                        return true;
                    }
                    if ancestor == root {
                        break;
                    }
                    current = ancestor.parent();
                }
                false
            }
            Self::PreviousSibling(inner) => {
                element != root
                    && element
                        .previous_element_sibling()
                        .is_some_and(|sibling| inner.matches(sibling, root))
            }
            Self::PreviousSiblings(inner) => {
                element != root
                    && element
                        .previous_element_siblings()
                        .into_iter()
                        .any(|sibling| inner.matches(sibling, root))
            }
        }
    }
}

fn sibling_index<E: Element>(element: E) -> i64 {
    element.element_sibling_index() as i64
}

/// Values were lowercased and unquoted at parse time
fn matches_attribute(actual: Option<&str>, op: AttributeOp, expected: &str) -> bool {
    let Some(actual) = actual else {
        // an absent attribute never holds the value
        return op == AttributeOp::NotEquals;
    };
    let actual = actual.trim().to_ascii_lowercase();
    match op {
        AttributeOp::Equals => actual == expected,
        AttributeOp::NotEquals => actual != expected,
        AttributeOp::Prefix => actual.starts_with(expected),
        AttributeOp::Suffix => actual.ends_with(expected),
        AttributeOp::Contains => actual.contains(expected),
    }
}

/// 1-based position among the counted siblings; `None` for elements
/// directly under the document or without a parent at all
fn nth_position<E: Element>(element: E, kind: NthKind) -> Option<i32> {
    let parent = element.parent()?;
    if parent.is_document() {
        return None;
    }

    let siblings = parent.children();
    let mut counted = siblings
        .iter()
        .filter(|sibling| !kind.of_type() || sibling.tag_name() == element.tag_name());

    let index = if kind.from_end() {
        counted.rev().position(|sibling| *sibling == element)
    } else {
        counted.position(|sibling| *sibling == element)
    }?;

    i32::try_from(index + 1).ok()
}

fn write_joined(f: &mut fmt::Formatter<'_>, evaluators: &[Evaluator], separator: &str) -> fmt::Result {
    for (i, evaluator) in evaluators.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", evaluator)?;
    }
    Ok(())
}

impl fmt::Display for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal(None) => f.write_str("*"),
            Self::Universal(Some(tag)) => write!(f, "*{}", tag),
            Self::Root => f.write_str(":scope"),
            Self::Tag(tag) => f.write_str(tag),
            Self::Id(id) => write!(f, "#{}", id),
            Self::Class(class) => write!(f, ".{}", class),
            Self::Attribute(key) => write!(f, "[{}]", key),
            Self::AttributeStarting(prefix) => write!(f, "[^{}]", prefix),
            Self::AttributeValue { key, op, value } => write!(f, "[{}{}{}]", key, op.as_str(), value),
            Self::AttributeMatches { key, pattern } => write!(f, "[{}~={}]", key, pattern),
            Self::IndexLessThan(index) => write!(f, ":lt({})", index),
            Self::IndexGreaterThan(index) => write!(f, ":gt({})", index),
            Self::IndexEquals(index) => write!(f, ":eq({})", index),
            Self::Nth { kind, expr } => write!(f, ":{}({})", kind.pseudo_name(), expr),
            Self::FirstChild => f.write_str(":first-child"),
            Self::LastChild => f.write_str(":last-child"),
            Self::FirstOfType => f.write_str(":first-of-type"),
            Self::LastOfType => f.write_str(":last-of-type"),
            Self::OnlyChild => f.write_str(":only-child"),
            Self::OnlyOfType => f.write_str(":only-of-type"),
            Self::Empty => f.write_str(":empty"),
            Self::IsRoot => f.write_str(":root"),
            Self::ContainsText(text) => write!(f, ":contains({})", text),
            Self::ContainsOwnText(text) => write!(f, ":containsOwn({})", text),
            Self::ContainsData(data) => write!(f, ":containsData({})", data),
            Self::Matches(pattern) => write!(f, ":matches({})", pattern),
            Self::MatchesOwn(pattern) => write!(f, ":matchesOwn({})", pattern),
            Self::Has(inner) => write!(f, ":has({})", inner),
            Self::Not(inner) => write!(f, ":not({})", inner),
            Self::And(evaluators) => write_joined(f, evaluators, " "),
            Self::Or(evaluators) => write_joined(f, evaluators, ", "),
            Self::ImmediateParent(inner) => write!(f, ":ImmediateParent{}", inner),
            Self::Ancestor(inner) => write!(f, ":parent{}", inner),
            Self::PreviousSibling(inner) => write!(f, ":prev{}", inner),
            Self::PreviousSiblings(inner) => write!(f, ":prev*{}", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_tag_and_universal() {
        let tree = fixtures::three_paragraphs();
        let ps = fixtures::by_tag(&tree, "p");
        let root = tree.document();

        assert!(Evaluator::Tag("p".into()).matches(ps[0], root));
        assert!(Evaluator::Universal(None).matches(root, root));
        assert!(Evaluator::Universal(Some("p".into())).matches(ps[1], root));
        assert!(!Evaluator::Universal(Some("div".into())).matches(ps[1], root));
    }

    #[test]
    fn test_id_is_case_sensitive_class_is_not() {
        let tree = fixtures::three_paragraphs();
        let ps = fixtures::by_tag(&tree, "p");
        let root = tree.document();

        assert!(Evaluator::Id("0".into()).matches(ps[0], root));
        assert!(Evaluator::Class("one".into()).matches(ps[0], root));
        assert!(!Evaluator::Class("one".into()).matches(ps[2], root));
    }

    #[test]
    fn test_missing_attribute_is_false() {
        let tree = fixtures::three_paragraphs();
        let ps = fixtures::by_tag(&tree, "p");
        let root = tree.document();

        let eq = Evaluator::AttributeValue {
            key: "title".into(),
            op: AttributeOp::Equals,
            value: "x".into(),
        };
        assert!(!eq.matches(ps[0], root));
        assert!(!Evaluator::Attribute("title".into()).matches(ps[0], root));
        assert!(!Evaluator::AttributeStarting("data-".into()).matches(ps[0], root));
    }

    #[test]
    fn test_structural_does_not_escape_root() {
        let tree = fixtures::three_paragraphs();
        let body = fixtures::by_tag(&tree, "body")[0];
        let ps = fixtures::by_tag(&tree, "p");

        let under_body = Evaluator::Ancestor(Box::new(Evaluator::Tag("body".into())));
        assert!(under_body.matches(ps[0], tree.document()));
        assert!(under_body.matches(ps[0], body));

        let under_html = Evaluator::Ancestor(Box::new(Evaluator::Tag("html".into())));
        assert!(under_html.matches(ps[0], tree.document()));
        assert!(!under_html.matches(ps[0], body));
        assert!(!under_body.matches(body, body));
    }

    #[test]
    fn test_nth_skips_document_children() {
        let tree = fixtures::three_paragraphs();
        let html = fixtures::by_tag(&tree, "html")[0];
        let first = Evaluator::Nth { kind: NthKind::Child, expr: NthExpr::new(0, 1) };

        assert!(!first.matches(html, tree.document()));
        assert!(!first.matches(tree.document(), tree.document()));
    }

    #[test]
    fn test_display() {
        let eval = Evaluator::And(vec![
            Evaluator::Tag("li".into()),
            Evaluator::PreviousSibling(Box::new(Evaluator::And(vec![
                Evaluator::Tag("li".into()),
                Evaluator::ImmediateParent(Box::new(Evaluator::Tag("ol".into()))),
            ]))),
        ]);
        assert_eq!(eval.to_string(), "li :prevli :ImmediateParentol");

        let or = Evaluator::Or(vec![Evaluator::Id("a".into()), Evaluator::Class("b".into())]);
        assert_eq!(or.to_string(), "#a, .b");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_evaluator_is_send_and_sync() {
        assert_send_sync::<Evaluator>();
    }

    #[test]
    fn test_shared_evaluator_across_threads() {
        let evaluator = crate::parse("p:matches(^t), .two").unwrap();
        let first = fixtures::three_paragraphs();
        let second = fixtures::mixed_content();

        let ids_in = |tree: &sieve_dom::DomTree| -> Vec<Option<String>> {
            crate::select(&evaluator, tree.document())
                .into_iter()
                .map(|e| e.id().map(str::to_string))
                .collect()
        };

        let (from_first, from_second) = std::thread::scope(|scope| {
            let a = scope.spawn(|| ids_in(&first));
            let b = scope.spawn(|| ids_in(&second));
            (a.join().unwrap(), b.join().unwrap())
        });

        assert_eq!(from_first, vec![Some("0".to_string()), Some("2".to_string())]);
        assert_eq!(from_first, ids_in(&first));
        assert_eq!(from_second, ids_in(&second));
    }
}
