//! Sieve DOM - element tree consumed by the selector engine
//!
//! An arena-backed document tree. Building it from markup is somebody
//! else's job; this crate only stores nodes and answers navigation and
//! text queries about them.

mod element;
mod error;
mod node;
mod tree;

pub use element::ElementRef;
pub use error::{DomError, DomResult};
pub use node::{ElementData, Node, NodeId, NodeType, ROOT_TAG};
pub use tree::DomTree;
