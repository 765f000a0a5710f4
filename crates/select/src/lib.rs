//! Sieve Select - CSS-style selector queries over element trees
//!
//! This crate provides:
//! - A lexer that splits selectors into compounds and combinators
//! - A recursive-descent parser producing an [`Evaluator`] tree
//! - `an+b` arithmetic for the nth pseudo-classes
//! - A matching engine that collects matches in document order
//!
//! The engine works against the [`Element`] trait; [`sieve_dom::ElementRef`]
//! implements it out of the box.
//!
//! ```ignore
//! let evaluator = sieve_select::parse("ul > li:nth-child(odd)")?;
//! let items = sieve_select::select(&evaluator, tree.document());
//! ```

mod collector;
mod element;
mod error;
mod evaluator;
mod lexer;
mod nth;
mod parser;

#[cfg(test)]
mod fixtures;

pub use collector::{select, select_first, select_from_roots, select_query};
pub use element::Element;
pub use error::{ErrorKind, SelectorError, SelectorResult};
pub use evaluator::{AttributeOp, Evaluator, NthKind};
pub use lexer::{Combinator, Lexer, Token};
pub use nth::NthExpr;
pub use parser::parse;
