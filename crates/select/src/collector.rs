//! Matching engine
//!
//! Walks a subtree in document order and keeps every element the
//! evaluator accepts.

use std::hash::Hash;

use log::trace;
use rustc_hash::FxHashSet;
use smallvec::{smallvec, SmallVec};

use crate::element::Element;
use crate::error::SelectorResult;
use crate::evaluator::Evaluator;
use crate::parser;

/// Elements under `root` (inclusive) matching `evaluator`, in document order
pub fn select<E: Element>(evaluator: &Evaluator, root: E) -> Vec<E> {
    let mut matched = Vec::new();
    let mut stack: SmallVec<[E; 32]> = smallvec![root];

    while let Some(element) = stack.pop() {
        if evaluator.matches(element, root) {
            matched.push(element);
        }
        stack.extend(element.children().into_iter().rev());
    }

    trace!("'{}' matched {} element(s)", evaluator, matched.len());
    matched
}

/// First element under `root` (inclusive) matching `evaluator`
pub fn select_first<E: Element>(evaluator: &Evaluator, root: E) -> Option<E> {
    let mut stack: SmallVec<[E; 32]> = smallvec![root];

    while let Some(element) = stack.pop() {
        if evaluator.matches(element, root) {
            return Some(element);
        }
        stack.extend(element.children().into_iter().rev());
    }
    None
}

/// Compile `query` and run it from `root`
pub fn select_query<E: Element>(query: &str, root: E) -> SelectorResult<Vec<E>> {
    let evaluator = parser::parse(query)?;
    Ok(select(&evaluator, root))
}

/// Run `evaluator` from each of `roots` and merge the results, keeping the
/// first occurrence of every element
pub fn select_from_roots<E: Element + Hash>(evaluator: &Evaluator, roots: &[E]) -> Vec<E> {
    let mut seen: FxHashSet<E> = FxHashSet::default();
    let mut merged: Vec<E> = Vec::new();
    for &root in roots {
        for element in select(evaluator, root) {
            if seen.insert(element) {
                merged.push(element);
            }
        }
    }
    merged
}
